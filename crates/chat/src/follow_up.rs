//! Follow-up message synthesis for completed habits.
//!
//! After the habit service records a log entry it can hand the event here
//! and feed the returned text straight back into the gateway as an ordinary
//! chat message. The dispatcher has no special path for it — by the time it
//! arrives it is indistinguishable from organic user input.

/// A completed-habit event as reported by the habit/log collaborator.
#[derive(Debug, Clone, Default)]
pub struct HabitEvent {
    pub title: String,
    /// The recorded metric (minutes of focus, energy level, percent done).
    pub metric_value: Option<f64>,
    pub notes: Option<String>,
    /// The per-habit persona directive stored alongside the habit
    /// definition, telling the companion how to react to this habit.
    pub persona_directive: Option<String>,
}

/// Format the event into the message the collaborator sends on the user's
/// behalf.
#[must_use]
pub fn follow_up_message(event: &HabitEvent) -> String {
    let mut msg = format!("I just completed \"{}\".", event.title);

    if let Some(value) = event.metric_value {
        msg.push_str(&format!(" Recorded value: {value}."));
    }

    if let Some(notes) = event.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        msg.push_str(&format!(" My notes: {notes}"));
    }

    if let Some(directive) = event
        .persona_directive
        .as_deref()
        .filter(|d| !d.trim().is_empty())
    {
        msg.push_str(&format!("\n\n(Coach context: {directive})"));
    }

    msg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_only() {
        let event = HabitEvent {
            title: "Entreno Físico".into(),
            ..HabitEvent::default()
        };
        assert_eq!(
            follow_up_message(&event),
            "I just completed \"Entreno Físico\"."
        );
    }

    #[test]
    fn full_event_embeds_every_field() {
        let event = HabitEvent {
            title: "Estudio: Web & IA".into(),
            metric_value: Some(45.0),
            notes: Some("learned about lifetimes".into()),
            persona_directive: Some("Ask one quick technical question.".into()),
        };
        let msg = follow_up_message(&event);
        assert!(msg.contains("Estudio: Web & IA"));
        assert!(msg.contains("45"));
        assert!(msg.contains("learned about lifetimes"));
        assert!(msg.contains("Ask one quick technical question."));
    }

    #[test]
    fn blank_notes_are_skipped() {
        let event = HabitEvent {
            title: "Gym".into(),
            notes: Some("   ".into()),
            ..HabitEvent::default()
        };
        assert!(!follow_up_message(&event).contains("notes"));
    }
}
