//! Session-level behavior of the RUSH store: the data-consistency properties
//! that must hold across any sequence of commands.

use rush_store::domain::{
    GeoPoint, NewPopup, NewReview, PopupStatus, ProfilePatch, Role, RsvpStatus,
};
use rush_store::{ActivityFeed, ExecuteError, RushStore, Seed, StoreError};

fn demo_store() -> RushStore {
    RushStore::from_seed(Seed::demo().expect("bundled seed"))
}

/// Signed in as Maya, who follows Lin and is going to the noodle drop.
fn maya() -> RushStore {
    let mut store = demo_store();
    store
        .login("maya@stanford.edu", "boba4life", Role::General)
        .expect("seeded login");
    store
}

/// Signed in as Lin, who runs the noodle and dumpling popups.
fn lin() -> RushStore {
    let mut store = demo_store();
    store
        .login("chef.lin@stanford.edu", "wokhei", Role::General)
        .expect("seeded login");
    store
}

fn sample_popup(creator_id: &str) -> NewPopup {
    NewPopup {
        creator_id: creator_id.into(),
        campus_id: "campus-berkeley".into(),
        title: "Ube Pancakes".into(),
        description: "Purple and proud.".into(),
        location_name: "Memorial Glade".into(),
        location: GeoPoint {
            lat: 37.8732,
            lng: -122.2594,
        },
        starts_at: "2026-11-01T17:00:00Z".parse().unwrap(),
        ends_at: None,
        capacity: Some(40),
        menu: vec![],
        dietary_tags: vec!["vegetarian".into()],
        food_type: Some("filipino".into()),
    }
}

fn assert_follow_symmetry(store: &RushStore) {
    let state = store.state();
    for user in &state.users {
        for creator_id in &user.following {
            let creator = state.creator(creator_id).expect("followed creator exists");
            assert!(
                creator.followers.contains(&user.id),
                "{} follows {} but is not in its followers",
                user.id,
                creator_id
            );
        }
    }
    for creator in &state.creators {
        for user_id in &creator.followers {
            let user = state.user(user_id).expect("follower exists");
            assert!(
                user.following.contains(&creator.id),
                "{} lists {} as follower but the user does not follow back",
                creator.id,
                user_id
            );
        }
    }
}

#[test]
fn rsvp_uniqueness_keeps_latest_status() {
    let mut store = maya();
    let statuses = [
        RsvpStatus::Interested,
        RsvpStatus::Going,
        RsvpStatus::Going,
        RsvpStatus::Interested,
    ];
    for status in statuses {
        store.rsvp("popup-dumplings", status).unwrap();
    }

    let state = store.state();
    let user_id = state.current_user_id.as_deref().unwrap();
    let mine: Vec<_> = state
        .rsvps
        .iter()
        .filter(|r| r.user_id == user_id && r.popup_id == "popup-dumplings")
        .collect();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].status, RsvpStatus::Interested);
}

#[test]
fn follow_symmetry_holds_after_every_toggle() {
    let mut store = maya();
    assert_follow_symmetry(&store);

    for creator_id in ["creator-oscar", "creator-lin", "creator-oscar", "creator-lin"] {
        store.follow_creator(creator_id).unwrap();
        assert_follow_symmetry(&store);
    }
    // Two toggles each: back where we started.
    assert!(store.state().is_following("creator-lin"));
    assert!(!store.state().is_following("creator-oscar"));
}

#[test]
fn avg_rating_zero_guard_and_mean() {
    let mut store = maya();
    assert_eq!(store.state().avg_rating("popup-noodles"), 0.0);

    for rating in [4, 5] {
        store
            .add_review(NewReview {
                popup_id: "popup-noodles".into(),
                rating,
                text: String::new(),
            })
            .unwrap();
    }
    assert_eq!(store.state().avg_rating("popup-noodles"), 4.5);
}

#[test]
fn attendance_is_terminal() {
    let mut store = lin();
    store.set_attendance("popup-dumplings", 37).unwrap();

    // Nothing afterwards moves the popup out of `past`.
    let err = store.set_attendance("popup-dumplings", 12).unwrap_err();
    assert!(matches!(
        err,
        ExecuteError::Domain(StoreError::AttendanceAlreadyRecorded(_))
    ));
    store.rsvp("popup-dumplings", RsvpStatus::Going).unwrap();
    store.cancel_rsvp("popup-dumplings").unwrap();

    let popup = store.state().popup("popup-dumplings").unwrap();
    assert_eq!(popup.status, PopupStatus::Past);
    assert_eq!(popup.attendance, 37);
}

#[test]
fn negative_attendance_is_rejected_without_mutation() {
    let mut store = maya();
    let before = store.snapshot();
    let err = store.set_attendance("popup-noodles", -5).unwrap_err();
    assert!(matches!(err, ExecuteError::Domain(StoreError::Validation(_))));
    assert_eq!(*before, *store.snapshot());
}

#[test]
fn login_is_idempotent_on_match() {
    let mut store = demo_store();
    store.login("chef.lin@stanford.edu", "wokhei", Role::General).unwrap();
    let first = store.state().current_user_id.clone();
    store.logout().unwrap();
    store.login("chef.lin@stanford.edu", "wokhei", Role::Creator).unwrap();

    let state = store.state();
    assert_eq!(state.current_user_id, first);
    assert_eq!(state.current_user_id.as_deref(), Some("user-lin"));
    assert_eq!(state.users.len(), 4);
    assert_eq!(state.creators.len(), 2);
    // The role argument is ignored for an existing account.
    assert_eq!(state.current_user().unwrap().role, Role::Creator);
}

#[test]
fn new_creator_signup() {
    let mut store = demo_store();
    store.login("chef@uni.edu", "pw1234", Role::Creator).unwrap();

    let state = store.state();
    let user = state.current_user().expect("signed in");
    assert_eq!(user.role, Role::Creator);
    assert_eq!(user.email, "chef@uni.edu");
    let creator = state.current_creator().expect("paired creator");
    assert_eq!(user.creator_id.as_deref(), Some(creator.id.as_str()));
    assert_eq!(creator.user_id, user.id);
    assert!(creator.followers.is_empty());
}

#[test]
fn wrong_password_does_not_create_an_account() {
    let mut store = demo_store();
    let err = store
        .login("maya@stanford.edu", "not-boba", Role::General)
        .unwrap_err();
    assert!(matches!(
        err,
        ExecuteError::Domain(StoreError::InvalidCredentials)
    ));
    assert_eq!(store.state().users.len(), 4);
    assert!(store.state().current_user_id.is_none());
}

#[test]
fn cancel_then_re_rsvp() {
    let mut store = maya();
    store.rsvp("popup-dumplings", RsvpStatus::Going).unwrap();
    store.cancel_rsvp("popup-dumplings").unwrap();
    assert!(store.state().user_rsvp("popup-dumplings").is_none());

    store.rsvp("popup-dumplings", RsvpStatus::Interested).unwrap();
    let rsvps = store.state().popup_rsvps("popup-dumplings");
    assert_eq!(rsvps.len(), 1);
    assert_eq!(rsvps[0].status, RsvpStatus::Interested);
}

#[test]
fn trending_ranks_by_score() {
    let mut store = maya();
    // Noodles: Maya's seeded RSVP plus two more users.
    for email in ["a@stanford.edu", "b@stanford.edu"] {
        store.logout().unwrap();
        store.login(email, "pw", Role::General).unwrap();
        store.rsvp("popup-noodles", RsvpStatus::Going).unwrap();
    }
    store.logout().unwrap();
    store.login("chef.lin@stanford.edu", "wokhei", Role::General).unwrap();
    store.set_attendance("popup-noodles", 10).unwrap();
    for rating in [4, 4] {
        store
            .add_review(NewReview {
                popup_id: "popup-noodles".into(),
                rating,
                text: String::new(),
            })
            .unwrap();
    }

    let state = store.state();
    let noodles = state.popup("popup-noodles").unwrap();
    let tacos = state.popup("popup-tacos").unwrap();
    assert_eq!(state.trending_score(noodles), 120.0);
    assert_eq!(state.trending_score(tacos), 250.0);

    let order: Vec<&str> = state.trending().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(order, vec!["popup-tacos", "popup-noodles", "popup-dumplings"]);
}

#[test]
fn signed_out_commands_are_rejected() {
    let mut store = demo_store();
    let err = store.rsvp("popup-noodles", RsvpStatus::Going).unwrap_err();
    assert!(matches!(err, ExecuteError::Domain(StoreError::Unauthenticated)));
    let err = store.follow_creator("creator-lin").unwrap_err();
    assert!(matches!(err, ExecuteError::Domain(StoreError::Unauthenticated)));
    assert!(store.journal().is_empty());
}

#[test]
fn creator_commands_need_the_owning_account() {
    let mut store = demo_store();
    let err = store.create_popup(sample_popup("creator-ghost")).unwrap_err();
    assert!(matches!(err, ExecuteError::Domain(StoreError::Unauthenticated)));
    let err = store.set_attendance("popup-noodles", 3).unwrap_err();
    assert!(matches!(err, ExecuteError::Domain(StoreError::Unauthenticated)));

    store.login("maya@stanford.edu", "boba4life", Role::General).unwrap();
    let err = store.create_popup(sample_popup("creator-ghost")).unwrap_err();
    assert!(matches!(
        err,
        ExecuteError::Domain(StoreError::NotCreatorOwner(ref id)) if id == "creator-ghost"
    ));
    let err = store.set_attendance("popup-noodles", 3).unwrap_err();
    assert!(matches!(
        err,
        ExecuteError::Domain(StoreError::NotCreatorOwner(ref id)) if id == "creator-lin"
    ));

    let state = store.state();
    assert_eq!(state.popups.len(), 3);
    assert_eq!(state.popup("popup-noodles").unwrap().status, PopupStatus::Upcoming);
    assert!(store.journal().iter().all(|e| e.event_type == "SignedIn"));
}

#[test]
fn creator_profile_update_reaches_both_records() {
    let mut store = demo_store();
    store.login("chef.lin@stanford.edu", "wokhei", Role::General).unwrap();
    store
        .update_profile(ProfilePatch {
            name: Some("Lin Noodle Co".into()),
            bio: Some(None),
            email: Some("noodles@lin.example".into()),
            interests: Some(vec!["noodles".into()]),
            ..Default::default()
        })
        .unwrap();

    let state = store.state();
    let user = state.current_user().unwrap();
    assert_eq!(user.name, "Lin Noodle Co");
    assert_eq!(user.bio, None);
    assert_eq!(user.email, "chef.lin@stanford.edu");
    assert_eq!(user.interests, vec!["noodles"]);

    let creator = state.current_creator().unwrap();
    assert_eq!(creator.name, "Lin Noodle Co");
    assert_eq!(creator.bio, None);
    assert_eq!(creator.email.as_deref(), Some("noodles@lin.example"));
}

#[test]
fn published_popup_starts_upcoming() {
    let mut store = demo_store();
    store.login("chef@uni.edu", "pw1234", Role::Creator).unwrap();
    let creator_id = store.state().current_creator().unwrap().id.clone();

    store.create_popup(sample_popup(&creator_id)).unwrap();

    let state = store.state();
    let mine = state.creator_popups(&creator_id);
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].status, PopupStatus::Upcoming);
    assert_eq!(mine[0].attendance, 0);
    assert_eq!(state.campus_popups("campus-berkeley").len(), 2);
}

#[test]
fn journal_replay_reproduces_the_session() {
    let mut store = maya();
    store.select_campus("campus-berkeley").unwrap();
    store.rsvp("popup-tacos", RsvpStatus::Interested).unwrap();
    store.follow_creator("creator-oscar").unwrap();
    store
        .start_rumor(rush_store::domain::NewRumor {
            content: "mochi at the bus stop".into(),
            timeframe: "tonight".into(),
        })
        .unwrap();
    let note_id = store.state().notifications[0].id.clone();
    store.mark_notification_read(note_id).unwrap();
    store.set_has_launched(true).unwrap();

    assert_eq!(&store.rebuild(), store.state());
}

#[test]
fn activity_feed_tracks_the_session() {
    let mut store = maya();
    store.rsvp("popup-dumplings", RsvpStatus::Going).unwrap();
    store.follow_creator("creator-oscar").unwrap();

    let feed = store.projection::<ActivityFeed>().expect("registered by from_seed");
    let kinds: Vec<&str> = feed.entries.iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(kinds, vec!["CreatorFollowed", "RsvpPlaced"]);
    assert_eq!(feed.entries[1].popup_id.as_deref(), Some("popup-dumplings"));
    assert_eq!(feed.entries[0].actor.as_deref(), Some("user-maya"));
}
