//! The closed set of events published by the sleep-tracking application.
//!
//! The list follows the Sleep as Android automation documentation
//! (<https://docs.sleep.urbandroid.org/services/automation.html#events>).
//! Discriminators outside this set are rejected at parse time; the literal
//! `"Unknown"` test signal is handled upstream and is deliberately not a
//! variant here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A sleep-tracking lifecycle or detection event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepEvent {
    SleepTrackingStarted,
    SleepTrackingStopped,
    SleepTrackingPaused,
    SleepTrackingResumed,
    AlarmSnoozeClicked,
    AlarmSnoozeCanceled,
    TimeToBedAlarmAlert,
    AlarmAlertStart,
    AlarmAlertDismiss,
    AlarmSkipNext,
    ShowSkipNextAlarm,
    Rem,
    SmartPeriod,
    BeforeSmartPeriod,
    LullabyStart,
    LullabyStop,
    LullabyVolumeDown,
    DeepSleep,
    LightSleep,
    Awake,
    NotAwake,
    ApneaAlarm,
    Antisnoring,
    SoundEventSnore,
    SoundEventTalk,
    SoundEventCough,
    SoundEventBaby,
    SoundEventLaugh,
    BeforeAlarm,
    AlarmRescheduled,
}

/// The discriminator was not part of the closed enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sleep event `{0}`")]
pub struct UnknownEvent(pub String);

impl SleepEvent {
    /// Every known event, in documentation order.
    pub const ALL: [Self; 30] = [
        Self::SleepTrackingStarted,
        Self::SleepTrackingStopped,
        Self::SleepTrackingPaused,
        Self::SleepTrackingResumed,
        Self::AlarmSnoozeClicked,
        Self::AlarmSnoozeCanceled,
        Self::TimeToBedAlarmAlert,
        Self::AlarmAlertStart,
        Self::AlarmAlertDismiss,
        Self::AlarmSkipNext,
        Self::ShowSkipNextAlarm,
        Self::Rem,
        Self::SmartPeriod,
        Self::BeforeSmartPeriod,
        Self::LullabyStart,
        Self::LullabyStop,
        Self::LullabyVolumeDown,
        Self::DeepSleep,
        Self::LightSleep,
        Self::Awake,
        Self::NotAwake,
        Self::ApneaAlarm,
        Self::Antisnoring,
        Self::SoundEventSnore,
        Self::SoundEventTalk,
        Self::SoundEventCough,
        Self::SoundEventBaby,
        Self::SoundEventLaugh,
        Self::BeforeAlarm,
        Self::AlarmRescheduled,
    ];

    /// The wire discriminator, as published over MQTT.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SleepTrackingStarted => "sleep_tracking_started",
            Self::SleepTrackingStopped => "sleep_tracking_stopped",
            Self::SleepTrackingPaused => "sleep_tracking_paused",
            Self::SleepTrackingResumed => "sleep_tracking_resumed",
            Self::AlarmSnoozeClicked => "alarm_snooze_clicked",
            Self::AlarmSnoozeCanceled => "alarm_snooze_canceled",
            Self::TimeToBedAlarmAlert => "time_to_bed_alarm_alert",
            Self::AlarmAlertStart => "alarm_alert_start",
            Self::AlarmAlertDismiss => "alarm_alert_dismiss",
            Self::AlarmSkipNext => "alarm_skip_next",
            Self::ShowSkipNextAlarm => "show_skip_next_alarm",
            Self::Rem => "rem",
            Self::SmartPeriod => "smart_period",
            Self::BeforeSmartPeriod => "before_smart_period",
            Self::LullabyStart => "lullaby_start",
            Self::LullabyStop => "lullaby_stop",
            Self::LullabyVolumeDown => "lullaby_volume_down",
            Self::DeepSleep => "deep_sleep",
            Self::LightSleep => "light_sleep",
            Self::Awake => "awake",
            Self::NotAwake => "not_awake",
            Self::ApneaAlarm => "apnea_alarm",
            Self::Antisnoring => "antisnoring",
            Self::SoundEventSnore => "sound_event_snore",
            Self::SoundEventTalk => "sound_event_talk",
            Self::SoundEventCough => "sound_event_cough",
            Self::SoundEventBaby => "sound_event_baby",
            Self::SoundEventLaugh => "sound_event_laugh",
            Self::BeforeAlarm => "before_alarm",
            Self::AlarmRescheduled => "alarm_rescheduled",
        }
    }
}

impl fmt::Display for SleepEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SleepEvent {
    type Err = UnknownEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| UnknownEvent(s.to_string()))
    }
}
