//! Case-insensitive search over participant contact fields and ratings.

use crate::model::participant::Participant;

/// Returns participants matching `search_text`, in input order.
///
/// Matches case-insensitively as a substring of name, email, phone number,
/// GitHub id, LinkedIn profile, or the space-joined rating values. Blank
/// search text matches everything.
pub fn filter(participants: &[Participant], search_text: &str) -> Vec<Participant> {
    if search_text.trim().is_empty() {
        return participants.to_vec();
    }

    let needle = search_text.to_lowercase();
    participants
        .iter()
        .filter(|participant| matches(participant, &needle))
        .cloned()
        .collect()
}

/// Present, non-empty rating values joined by single spaces.
pub fn skills_text(participant: &Participant) -> String {
    participant
        .technical_skills
        .as_ref()
        .map(|skills| skills.rated_values().join(" "))
        .unwrap_or_default()
}

fn matches(participant: &Participant, needle: &str) -> bool {
    let contains = |value: &str| value.to_lowercase().contains(needle);
    let optional = |value: &Option<String>| value.as_deref().is_some_and(contains);

    contains(&participant.name)
        || contains(&participant.email)
        || optional(&participant.phone_number)
        || optional(&participant.github_id)
        || optional(&participant.linked_in_profile)
        || contains(&skills_text(participant))
}
