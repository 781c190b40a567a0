//! Transient feedback state with scoped, reschedulable expiry
//!
//! All timing runs on a caller-supplied monotonic clock (`Duration` since
//! start), which keeps the state machines deterministic and frame-driven.

use std::time::Duration;

use crate::color::Rgb;
use crate::region::Category;

/// Keyed one-shot deadlines. Arming an armed key replaces its deadline.
#[derive(Debug, Clone)]
pub struct Deadlines<K> {
    entries: Vec<(K, Duration)>,
}

impl<K> Default for Deadlines<K> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<K: Copy + PartialEq> Deadlines<K> {
    /// Schedule `key` to expire at `now + delay`.
    /// Returns true when an earlier deadline for the key was cancelled.
    pub fn arm(&mut self, key: K, now: Duration, delay: Duration) -> bool {
        let due = now + delay;
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => {
                entry.1 = due;
                true
            }
            None => {
                self.entries.push((key, due));
                false
            }
        }
    }

    pub fn cancel(&mut self, key: K) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(k, _)| *k != key);
        self.entries.len() != before
    }

    pub fn is_armed(&self, key: K) -> bool {
        self.entries.iter().any(|(k, _)| *k == key)
    }

    pub fn due(&self, key: K) -> Option<Duration> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, due)| *due)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove and return every key due at or before `now`, earliest first
    pub fn drain_expired(&mut self, now: Duration) -> Vec<K> {
        let mut expired: Vec<(K, Duration)> = Vec::new();
        self.entries.retain(|&(key, due)| {
            if due <= now {
                expired.push((key, due));
                false
            } else {
                true
            }
        });
        // Stable sort keeps arming order for equal deadlines
        expired.sort_by_key(|&(_, due)| due);
        expired.into_iter().map(|(key, _)| key).collect()
    }
}

/// Emissive flashes that always restore the pre-highlight color.
///
/// The original color is captured only when a key has no flash outstanding.
/// Re-acquiring during a flash keeps that saved color and pushes the restore
/// back, so overlapping clicks cannot leave a stale color behind.
#[derive(Debug, Clone)]
pub struct HighlightTracker<K> {
    saved: Vec<(K, Rgb)>,
    deadlines: Deadlines<K>,
}

impl<K> Default for HighlightTracker<K> {
    fn default() -> Self {
        Self {
            saved: Vec::new(),
            deadlines: Deadlines::default(),
        }
    }
}

impl<K: Copy + PartialEq> HighlightTracker<K> {
    /// Start or extend a flash on `key`.
    ///
    /// `current` is the color the surface shows right now; it is remembered
    /// only if this key is not already flashing.
    pub fn acquire(&mut self, key: K, current: Rgb, now: Duration, hold: Duration) {
        if !self.saved.iter().any(|(k, _)| *k == key) {
            self.saved.push((key, current));
        }
        self.deadlines.arm(key, now, hold);
    }

    pub fn is_active(&self, key: K) -> bool {
        self.deadlines.is_armed(key)
    }

    /// Color that will be restored for `key`, if it is flashing
    pub fn saved(&self, key: K) -> Option<Rgb> {
        self.saved.iter().find(|(k, _)| *k == key).map(|(_, c)| *c)
    }

    /// Flashes whose hold ran out, paired with the color to restore
    pub fn release_expired(&mut self, now: Duration) -> Vec<(K, Rgb)> {
        self.deadlines
            .drain_expired(now)
            .into_iter()
            .filter_map(|key| {
                let index = self.saved.iter().position(|(k, _)| *k == key)?;
                Some(self.saved.swap_remove(index))
            })
            .collect()
    }
}

/// Outline pulses on the counter fields
#[derive(Debug, Clone, Default)]
pub struct FieldPulses {
    deadlines: Deadlines<Category>,
}

impl FieldPulses {
    pub fn start(&mut self, category: Category, now: Duration, hold: Duration) {
        self.deadlines.arm(category, now, hold);
    }

    pub fn is_pulsing(&self, category: Category) -> bool {
        self.deadlines.is_armed(category)
    }

    /// Pulses that ended at or before `now`
    pub fn expire(&mut self, now: Duration) -> Vec<Category> {
        self.deadlines.drain_expired(now)
    }
}

/// Floating feedback message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub text: String,
    pub shown_at: Duration,
    pub expires_at: Duration,
}

impl Toast {
    /// Remaining lifetime in `0.0..=1.0`, for fading
    pub fn remaining_fraction(&self, now: Duration) -> f32 {
        let total = self.expires_at.saturating_sub(self.shown_at).as_secs_f32();
        if total <= 0.0 {
            return 0.0;
        }
        (self.expires_at.saturating_sub(now).as_secs_f32() / total).clamp(0.0, 1.0)
    }
}

/// Self-removing messages; several can be on screen at once
#[derive(Debug, Clone, Default)]
pub struct Toasts {
    items: Vec<Toast>,
    next_id: u64,
}

impl Toasts {
    pub fn show(&mut self, text: impl Into<String>, now: Duration, lifetime: Duration) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Toast {
            id,
            text: text.into(),
            shown_at: now,
            expires_at: now + lifetime,
        });
        id
    }

    /// Visible toasts, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop toasts whose lifetime ended; returns how many were removed
    pub fn expire(&mut self, now: Duration) -> usize {
        let before = self.items.len();
        self.items.retain(|t| t.expires_at > now);
        before - self.items.len()
    }
}
