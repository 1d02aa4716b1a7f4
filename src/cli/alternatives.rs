//! Things to do instead of buying, picked from how the user felt at the
//! time of the deferred purchase.

use impulse_domain::{Fatigue, Mood};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alternative {
    pub title: &'static str,
    pub description: &'static str,
}

impl Alternative {
    const fn new(title: &'static str, description: &'static str) -> Self {
        Self { title, description }
    }
}

const REST: [Alternative; 3] = [
    Alternative::new("Take a bath", "Unwind in warm water"),
    Alternative::new("Stretch", "Five minutes of light stretching"),
    Alternative::new("Nap", "A short fifteen-minute break"),
];

const CHANGE_OF_SCENE: [Alternative; 3] = [
    Alternative::new("Go for a walk", "Ten minutes outside"),
    Alternative::new("Listen to music", "Put on a favourite song"),
    Alternative::new("Visit a cafe", "Relax somewhere different"),
];

const LIGHT_HOBBIES: [Alternative; 3] = [
    Alternative::new("Read", "Just a few pages"),
    Alternative::new("Hobby time", "Fifteen minutes on something you enjoy"),
    Alternative::new("Call a friend", "Talk to someone"),
];

const ACTIVE: [Alternative; 3] = [
    Alternative::new("Exercise", "Light exercise to lift the mood further"),
    Alternative::new("Write a journal", "Note down how you feel right now"),
    Alternative::new("Review your goals", "Plan what comes next"),
];

/// Suggestions for the given state. Tiredness outranks mood.
pub fn for_state(mood: Mood, fatigue: Fatigue) -> &'static [Alternative] {
    if fatigue.value() >= 3 {
        &REST
    } else if mood.value() <= 2 {
        &CHANGE_OF_SCENE
    } else if mood.value() == 3 {
        &LIGHT_HOBBIES
    } else {
        &ACTIVE
    }
}
