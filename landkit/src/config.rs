//! Configuration for the page components.
//!
//! One section per component plus the boot policy and the submission policy.
//! Every section deserializes with defaults, so a JSON file only needs to
//! name the values it overrides. Durations are stored as milliseconds.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::form::SubmissionPolicy;

/// What the bootstrap does when a component fails to initialize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum BootPolicy {
    /// Log the failure and leave every later component uninitialized.
    #[default]
    StopOnError,
    /// Log the failure and keep initializing the remaining components.
    Isolate,
}

/// Mobile navigation menu.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct NavigationConfig {
    /// Header landmark containing the navigation.
    pub header_selector: String,
    /// Navigation element, searched inside the header.
    pub nav_selector: String,
    /// Menu list, searched inside the navigation element.
    pub menu_selector: String,
    /// Links inside the navigation that close the open menu.
    pub link_selector: String,
    /// Class toggled on the navigation element while the menu is open.
    pub open_class: String,
    /// Viewports at least this wide use the desktop layout.
    pub breakpoint_px: i64,
    /// Quiet period before a resize is acted on.
    pub resize_debounce_ms: u64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            header_selector: "header".to_owned(),
            nav_selector: "nav".to_owned(),
            menu_selector: "ul".to_owned(),
            link_selector: "a".to_owned(),
            open_class: "nav-open".to_owned(),
            breakpoint_px: 768,
            resize_debounce_ms: 250,
        }
    }
}

impl NavigationConfig {
    #[must_use]
    pub const fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}

/// In-page anchor scrolling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct SmoothScrollConfig {
    /// Links handled by the component.
    pub link_selector: String,
    /// Fixed header whose height is subtracted from the scroll target.
    pub header_selector: String,
    /// Extra space left above the target, in pixels.
    pub extra_offset_px: i64,
}

impl Default for SmoothScrollConfig {
    fn default() -> Self {
        Self {
            link_selector: "a[href^=\"#\"]".to_owned(),
            header_selector: "header".to_owned(),
            extra_offset_px: 0,
        }
    }
}

/// Deferred image loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct LazyLoadConfig {
    pub image_selector: String,
    /// CSS-style root margin, e.g. `"50px"` or `"0px 0px -50px 0px"`.
    pub root_margin: String,
    pub threshold: f64,
    /// Class added once the real source is in place.
    pub loaded_class: String,
}

impl Default for LazyLoadConfig {
    fn default() -> Self {
        Self {
            image_selector: "img[data-src]".to_owned(),
            root_margin: "50px".to_owned(),
            threshold: 0.0,
            loaded_class: "loaded".to_owned(),
        }
    }
}

/// Contact form validation and submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct FormConfig {
    pub form_selector: String,
    /// Controls validated on blur, input and submit.
    pub field_selector: String,
    /// Container pairing a control with its label and error slot.
    pub group_selector: String,
    pub submit_selector: String,
    /// Quiet period after typing before a field is validated.
    pub validate_debounce_ms: u64,
    /// Lifetime of the success/error banner.
    pub message_timeout_ms: u64,
    /// Submit control label while a submission is in flight.
    pub sending_label: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            form_selector: "#contact-form".to_owned(),
            field_selector: "input, textarea".to_owned(),
            group_selector: ".form-group".to_owned(),
            submit_selector: "button[type=\"submit\"]".to_owned(),
            validate_debounce_ms: 300,
            message_timeout_ms: 5000,
            sending_label: "Sending...".to_owned(),
        }
    }
}

impl FormConfig {
    #[must_use]
    pub const fn validate_debounce(&self) -> Duration {
        Duration::from_millis(self.validate_debounce_ms)
    }

    #[must_use]
    pub const fn message_timeout(&self) -> Duration {
        Duration::from_millis(self.message_timeout_ms)
    }
}

/// Scroll-triggered reveal animations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct AnimationConfig {
    pub selector: String,
    pub visible_class: String,
    pub threshold: f64,
    pub root_margin: String,
    /// Scroll handling interval when intersection observation is unavailable.
    pub fallback_throttle_ms: u64,
    /// How far an element must be inside the viewport before the fallback reveals it.
    pub fallback_offset_px: i64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            selector: ".animate-on-scroll".to_owned(),
            visible_class: "visible".to_owned(),
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px".to_owned(),
            fallback_throttle_ms: 100,
            fallback_offset_px: 50,
        }
    }
}

impl AnimationConfig {
    #[must_use]
    pub const fn fallback_throttle(&self) -> Duration {
        Duration::from_millis(self.fallback_throttle_ms)
    }
}

/// Whole-page configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct LandingConfig {
    pub navigation: NavigationConfig,
    pub smooth_scroll: SmoothScrollConfig,
    pub lazy_load: LazyLoadConfig,
    pub form: FormConfig,
    pub animation: AnimationConfig,
    pub submission: SubmissionPolicy,
    pub boot_policy: BootPolicy,
}
