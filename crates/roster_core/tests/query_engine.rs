use chrono::{TimeZone, Utc};
use roster_core::{aggregate, filter, paginate, Participant, Skill, TechnicalSkills};

fn participant(id: &str, name: &str, email: &str) -> Participant {
    let now = Utc.with_ymd_and_hms(2025, 5, 20, 14, 0, 0).unwrap();
    Participant::with_id(id, name, email, now)
}

fn rated(id: &str, ratings: &[(Skill, &str)]) -> Participant {
    let mut p = participant(id, &format!("Person {id}"), &format!("{id}@example.com"));
    let mut skills = TechnicalSkills::default();
    for (skill, value) in ratings {
        skills.set_rating(*skill, Some(value.to_string()));
    }
    p.technical_skills = Some(skills);
    p
}

fn roster(count: usize) -> Vec<Participant> {
    (0..count)
        .map(|i| participant(&format!("p-{i}"), &format!("Person {i}"), &format!("p{i}@example.com")))
        .collect()
}

#[test]
fn empty_search_returns_everything_in_order() {
    let all = roster(4);
    assert_eq!(filter(&all, ""), all);
}

#[test]
fn unmatched_search_returns_nothing() {
    assert!(filter(&roster(4), "ZZZ-no-match").is_empty());
}

#[test]
fn search_is_case_insensitive() {
    let all = vec![
        participant("1", "Alice", "alice@example.com"),
        participant("2", "Bob", "bob@example.com"),
    ];
    let hits = filter(&all, "ALICE");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].email, "alice@example.com");
}

#[test]
fn search_matches_phone_linkedin_and_ratings() {
    let mut phone = participant("1", "Ann", "ann@example.com");
    phone.phone_number = Some("+44 20 7946 0958".to_string());
    let mut linkedin = participant("2", "Bob", "bob@example.com");
    linkedin.linked_in_profile = Some("https://uk.linkedin.com/in/BobBuilder".to_string());
    let ratings = rated("3", &[(Skill::Python, "9"), (Skill::Html, "4")]);
    let all = vec![phone, linkedin, ratings];

    assert_eq!(filter(&all, "7946")[0].id, "1");
    assert_eq!(filter(&all, "bobbuilder")[0].id, "2");
    let by_rating = filter(&all, "9 4");
    assert_eq!(by_rating.len(), 1);
    assert_eq!(by_rating[0].id, "3");
}

#[test]
fn pagination_clamps_final_page() {
    let all = roster(12);
    let last = paginate(&all, 2, 5);
    assert_eq!(last.len(), 2);
    assert_eq!(last[0].id, "p-10");
    assert_eq!(last[1].id, "p-11");
    assert!(paginate(&all, 5, 5).is_empty());
}

#[test]
fn aggregation_excludes_malformed_ratings() {
    let all = vec![
        rated("1", &[(Skill::Angular, "3")]),
        rated("2", &[(Skill::Angular, "7")]),
        rated("3", &[(Skill::Angular, "10")]),
        rated("4", &[(Skill::Angular, "abc")]),
    ];

    let stats = aggregate(&all);
    let angular = stats.skill(Skill::Angular);

    assert_eq!(angular.average, 7);
    let mut expected = [0u32; 10];
    expected[2] = 1;
    expected[6] = 1;
    expected[9] = 1;
    assert_eq!(angular.distribution, expected);
    assert_eq!(angular.rated_count, 3);
    assert_eq!(angular.malformed_count, 1);
    assert_eq!(stats.malformed_total(), 1);
}

#[test]
fn out_of_range_ratings_skip_histogram_but_count_toward_average() {
    let all = vec![
        rated("1", &[(Skill::Css, "0")]),
        rated("2", &[(Skill::Css, "12")]),
        rated("3", &[(Skill::Css, "5")]),
    ];

    let css = aggregate(&all).skill(Skill::Css).clone();
    assert_eq!(css.average, 6);
    assert_eq!(css.distribution.iter().sum::<u32>(), 1);
    assert_eq!(css.count_for(5), 1);
}

#[test]
fn averages_round_half_up() {
    let all = vec![
        rated("1", &[(Skill::Mysql, "6")]),
        rated("2", &[(Skill::Mysql, "7")]),
    ];
    assert_eq!(aggregate(&all).skill(Skill::Mysql).average, 7);
}

#[test]
fn fully_rated_requires_all_five_non_empty() {
    let all_five = [
        (Skill::Angular, "5"),
        (Skill::Python, "6"),
        (Skill::Css, "7"),
        (Skill::Html, "8"),
        (Skill::Mysql, "9"),
    ];
    let mut missing_one = all_five;
    missing_one[4] = (Skill::Mysql, "");
    let all = vec![
        rated("1", &all_five),
        rated("2", &missing_one),
        participant("3", "Nora", "nora@example.com"),
    ];

    let stats = aggregate(&all);
    assert_eq!(stats.participant_count, 3);
    assert_eq!(stats.fully_rated_count, 1);
    assert_eq!(stats.skill(Skill::Mysql).rated_count, 1);
}

#[test]
fn empty_collection_yields_zeroed_stats() {
    let stats = aggregate(&[]);
    assert_eq!(stats.participant_count, 0);
    assert_eq!(stats.fully_rated_count, 0);
    for skill in Skill::ALL {
        let skill_stats = stats.skill(skill);
        assert_eq!(skill_stats.average, 0);
        assert_eq!(skill_stats.distribution, [0; 10]);
        assert_eq!(skill_stats.progress_percentage(), 0.0);
    }
}
