//! # CoachGuard Insight
//!
//! Pure advisory generators over current user state. Nothing here
//! affects the allow/refuse verdict; the output is coaching-facing text
//! attached to the filtering result.

use coachguard_context::{Emotion, EmotionalState, UserMemoryContext};

/// Fixed vocabulary matched against goals and challenges for proactive
/// suggestions.
const SUGGESTION_TOPICS: &[(&str, &str)] = &[
    (
        "stress",
        "Consider a short daily wind-down ritual to keep stress from accumulating.",
    ),
    (
        "perfectionism",
        "Try time-boxing one task today and shipping whatever exists when the box closes.",
    ),
    (
        "relationships",
        "A weekly check-in conversation can surface small frictions before they grow.",
    ),
    (
        "overwhelm",
        "List everything on your plate, then pick the single item that unblocks the most.",
    ),
];

/// Derives insights from the interaction history and trust trajectory.
pub fn memory_insights(memory: &UserMemoryContext) -> Vec<String> {
    let mut insights = Vec::new();

    if memory.recent_interactions.len() >= 5 {
        insights.push(format!(
            "You have {} recent sessions on record; recurring themes may be worth revisiting.",
            memory.recent_interactions.len()
        ));
    }

    if memory.trust_level() > 0.8 {
        insights.push(
            "A strong working relationship is established; deeper goal work is an option."
                .to_string(),
        );
    }

    if memory.active_challenges.len() >= 3 {
        insights.push(format!(
            "You are juggling {} active challenges; narrowing focus to one may help.",
            memory.active_challenges.len()
        ));
    }

    insights
}

/// Derives guidance from the current emotional state.
pub fn emotional_guidance(state: &EmotionalState) -> Vec<String> {
    let mut guidance = Vec::new();

    if state.stability() < 0.3 {
        guidance.push(
            "Things feel turbulent right now; grounding exercises before big decisions can help."
                .to_string(),
        );
    }

    if state.intensity() > 0.8 {
        guidance.push(
            "Strong feelings are present; naming the emotion out loud often reduces its grip."
                .to_string(),
        );
    }

    match state.primary_emotion {
        Emotion::Anxious => guidance.push(
            "Anxiety narrows attention; a slow exhale longer than the inhale settles the nervous system."
                .to_string(),
        ),
        Emotion::Sad => guidance.push(
            "Low moods pass more gently with small physical actions, like a short walk outside."
                .to_string(),
        ),
        _ => {}
    }

    guidance
}

/// Matches goals and challenges against the suggestion vocabulary.
pub fn proactive_suggestions(goals: &[String], challenges: &[String]) -> Vec<String> {
    let haystack: Vec<String> = goals
        .iter()
        .chain(challenges.iter())
        .map(|s| s.to_lowercase())
        .collect();

    SUGGESTION_TOPICS
        .iter()
        .filter(|(topic, _)| haystack.iter().any(|entry| entry.contains(topic)))
        .map(|(_, suggestion)| suggestion.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use coachguard_context::InteractionRecord;

    #[test]
    fn test_no_insights_for_fresh_user() {
        let memory = UserMemoryContext::new("user-1", None);
        assert!(memory_insights(&memory).is_empty());
    }

    #[test]
    fn test_interaction_threshold_insight() {
        let mut memory = UserMemoryContext::new("user-1", None);
        for i in 0..5 {
            memory.record_interaction(InteractionRecord::new(&format!("p{}", i), 0.1, false));
        }
        let insights = memory_insights(&memory);
        assert!(insights.iter().any(|s| s.contains("5 recent sessions")));
    }

    #[test]
    fn test_high_trust_insight() {
        let mut memory = UserMemoryContext::new("user-1", None);
        memory.set_trust_level(0.9);
        let insights = memory_insights(&memory);
        assert!(insights.iter().any(|s| s.contains("working relationship")));
    }

    #[test]
    fn test_challenge_overload_insight() {
        let mut memory = UserMemoryContext::new("user-1", None);
        memory.active_challenges = vec![
            "sleep".to_string(),
            "focus".to_string(),
            "delegation".to_string(),
        ];
        let insights = memory_insights(&memory);
        assert!(insights.iter().any(|s| s.contains("3 active challenges")));
    }

    #[test]
    fn test_guidance_low_stability() {
        let state = EmotionalState::new(Emotion::Neutral, 0.5, 0.2);
        let guidance = emotional_guidance(&state);
        assert!(guidance.iter().any(|s| s.contains("turbulent")));
    }

    #[test]
    fn test_guidance_high_intensity() {
        let state = EmotionalState::new(Emotion::Angry, 0.9, 0.6);
        let guidance = emotional_guidance(&state);
        assert!(guidance.iter().any(|s| s.contains("Strong feelings")));
    }

    #[test]
    fn test_guidance_anxious_and_sad() {
        let anxious = EmotionalState::new(Emotion::Anxious, 0.5, 0.6);
        assert!(emotional_guidance(&anxious)
            .iter()
            .any(|s| s.contains("exhale")));

        let sad = EmotionalState::new(Emotion::Sad, 0.5, 0.6);
        assert!(emotional_guidance(&sad).iter().any(|s| s.contains("walk")));
    }

    #[test]
    fn test_guidance_calm_state_empty() {
        let state = EmotionalState::new(Emotion::Calm, 0.5, 0.8);
        assert!(emotional_guidance(&state).is_empty());
    }

    #[test]
    fn test_suggestions_match_goals() {
        let goals = vec!["reduce stress at work".to_string()];
        let suggestions = proactive_suggestions(&goals, &[]);
        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].contains("wind-down"));
    }

    #[test]
    fn test_suggestions_match_challenges() {
        let challenges = vec!["Perfectionism is slowing me down".to_string()];
        let suggestions = proactive_suggestions(&[], &challenges);
        assert!(suggestions.iter().any(|s| s.contains("time-boxing")));
    }

    #[test]
    fn test_suggestions_no_match() {
        let goals = vec!["learn guitar".to_string()];
        assert!(proactive_suggestions(&goals, &[]).is_empty());
    }
}
