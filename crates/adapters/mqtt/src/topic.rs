//! Topic resolution — from a configured template to the wildcard
//! subscription topic, and from received topics back to device identifiers.
//!
//! The template contains `/`-separated segments, at most one of which is the
//! device placeholder. The placeholder position and the wildcard topic are
//! pure functions of the immutable template, computed once at construction.
//! Per-topic device resolution is memoised in a bounded cache since the
//! mapping is stable for the lifetime of one configuration.

use std::collections::HashMap;
use std::sync::Mutex;

use sleepbridge_domain::device::DeviceId;
use sleepbridge_domain::error::ValidationError;

/// Reserved token marking where the device identifier appears in the
/// configured topic template.
pub const DEVICE_PLACEHOLDER: &str = "%%%device%%%";

/// Upper bound on memoised topic→device resolutions. Topic diversity is
/// normally tiny (one topic per device); the bound only guards against a
/// misbehaving publisher.
const RESOLUTION_CACHE_CAP: usize = 256;

/// Compiled form of a configured topic template.
#[derive(Debug)]
pub struct TopicFilter {
    template: String,
    subscribe_topic: String,
    placeholder_index: usize,
    resolutions: Mutex<HashMap<String, DeviceId>>,
}

impl TopicFilter {
    /// Compile a template: find the placeholder segment and derive the
    /// wildcard subscription topic.
    ///
    /// Without a placeholder, the index sentinel equals the segment count
    /// (meaning "use the last segment") and the subscription topic is the
    /// template unchanged.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let mut segments: Vec<&str> = template.split('/').collect();
        let placeholder_index = segments
            .iter()
            .position(|segment| *segment == DEVICE_PLACEHOLDER)
            .unwrap_or(segments.len());

        let subscribe_topic = if placeholder_index < segments.len() {
            segments[placeholder_index] = "+";
            segments.join("/")
        } else {
            template.clone()
        };

        Self {
            template,
            subscribe_topic,
            placeholder_index,
            resolutions: Mutex::new(HashMap::new()),
        }
    }

    /// The configured template this filter was compiled from.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Topic pattern for the actual subscribe call, with the placeholder
    /// segment replaced by the single-level wildcard `+`.
    #[must_use]
    pub fn subscribe_topic(&self) -> &str {
        &self.subscribe_topic
    }

    /// Zero-based segment index of the placeholder; equals the template's
    /// segment count when no placeholder is present.
    #[must_use]
    pub fn placeholder_index(&self) -> usize {
        self.placeholder_index
    }

    /// Extract the device identifier from a received topic.
    ///
    /// The segment at the placeholder index is used; when the index is out of
    /// range (template without placeholder, or a shorter topic than expected)
    /// the last segment is used instead.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTopic`] for an empty topic string and
    /// [`ValidationError::EmptyDeviceId`] when the selected segment is empty.
    pub fn device_from_topic(&self, topic: &str) -> Result<DeviceId, ValidationError> {
        if topic.is_empty() {
            return Err(ValidationError::EmptyTopic);
        }
        if let Ok(cache) = self.resolutions.lock() {
            if let Some(device) = cache.get(topic) {
                return Ok(device.clone());
            }
        }

        let segments: Vec<&str> = topic.split('/').collect();
        let index = if self.placeholder_index >= segments.len() {
            segments.len() - 1
        } else {
            self.placeholder_index
        };
        let device = DeviceId::new(segments[index])?;

        if let Ok(mut cache) = self.resolutions.lock() {
            if cache.len() < RESOLUTION_CACHE_CAP {
                cache.insert(topic.to_string(), device.clone());
            }
        }
        Ok(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_replace_placeholder_with_wildcard() {
        let filter = TopicFilter::new("SleepAsAndroid/%%%device%%%");
        assert_eq!(filter.subscribe_topic(), "SleepAsAndroid/+");
        assert_eq!(filter.placeholder_index(), 1);
    }

    #[test]
    fn should_handle_placeholder_in_the_middle() {
        let filter = TopicFilter::new("home/%%%device%%%/sleep/events");
        assert_eq!(filter.subscribe_topic(), "home/+/sleep/events");
        assert_eq!(filter.placeholder_index(), 1);
    }

    #[test]
    fn should_keep_template_without_placeholder_unchanged() {
        let filter = TopicFilter::new("SleepAsAndroid/fixed");
        assert_eq!(filter.subscribe_topic(), "SleepAsAndroid/fixed");
        // Sentinel: one past the last segment.
        assert_eq!(filter.placeholder_index(), 2);
    }

    #[test]
    fn should_use_first_placeholder_when_repeated() {
        let filter = TopicFilter::new("%%%device%%%/%%%device%%%");
        assert_eq!(filter.placeholder_index(), 0);
        assert_eq!(filter.subscribe_topic(), "+/%%%device%%%");
    }

    #[test]
    fn should_extract_device_at_placeholder_position() {
        let filter = TopicFilter::new("SleepAsAndroid/%%%device%%%");
        let device = filter.device_from_topic("SleepAsAndroid/phoneA").unwrap();
        assert_eq!(device.as_str(), "phoneA");
    }

    #[test]
    fn should_fall_back_to_last_segment_without_placeholder() {
        let filter = TopicFilter::new("SleepAsAndroid/fixed");
        let device = filter.device_from_topic("SleepAsAndroid/phoneA").unwrap();
        assert_eq!(device.as_str(), "phoneA");
    }

    #[test]
    fn should_fall_back_to_last_segment_for_short_topic() {
        let filter = TopicFilter::new("home/sleep/%%%device%%%");
        let device = filter.device_from_topic("phoneA").unwrap();
        assert_eq!(device.as_str(), "phoneA");
    }

    #[test]
    fn should_reject_empty_topic() {
        let filter = TopicFilter::new("SleepAsAndroid/%%%device%%%");
        assert_eq!(
            filter.device_from_topic(""),
            Err(ValidationError::EmptyTopic)
        );
    }

    #[test]
    fn should_reject_empty_device_segment() {
        let filter = TopicFilter::new("SleepAsAndroid/%%%device%%%");
        assert_eq!(
            filter.device_from_topic("SleepAsAndroid/"),
            Err(ValidationError::EmptyDeviceId)
        );
    }

    #[test]
    fn should_keep_device_names_case_sensitive() {
        let filter = TopicFilter::new("SleepAsAndroid/%%%device%%%");
        let lower = filter.device_from_topic("SleepAsAndroid/phone").unwrap();
        let upper = filter.device_from_topic("SleepAsAndroid/Phone").unwrap();
        assert_ne!(lower, upper);
    }

    #[test]
    fn should_resolve_consistently_from_cache() {
        let filter = TopicFilter::new("SleepAsAndroid/%%%device%%%");
        let first = filter.device_from_topic("SleepAsAndroid/phoneA").unwrap();
        let second = filter.device_from_topic("SleepAsAndroid/phoneA").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn should_roundtrip_template_substitution() {
        // Substituting a device name at the placeholder segment of the
        // template must produce a topic that resolves back to that name.
        for template in [
            "SleepAsAndroid/%%%device%%%",
            "home/%%%device%%%/sleep",
            "%%%device%%%/events",
        ] {
            let filter = TopicFilter::new(template);
            let topic = template.replace(DEVICE_PLACEHOLDER, "phone1");
            let device = filter.device_from_topic(&topic).unwrap();
            assert_eq!(device.as_str(), "phone1");
        }
    }
}
