#![forbid(unsafe_code)]
use chrono::NaiveDate;
use releve::{
    can_accept, can_delete, can_request_swap, check_acceptable, check_compatibility, check_swap,
    delete_action, resolve_display_status, AcceptRefusal, DeleteAction, DisplayStatus, Identity,
    Incompatibility, NurseId, NurseIdentity, PartySnapshot, RequestStatus, RestRule, Role,
    RuleTable, ScheduleSnapshot, ShiftCode, ShiftSwapRequest, SwapDetail,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
}

fn nurse(id: &str, identity: Identity) -> NurseIdentity {
    NurseIdentity::new(NurseId::new(id), Role::Staff, identity)
}

fn shift_request(requestor: &str, identity: Identity, date: NaiveDate) -> ShiftSwapRequest {
    ShiftSwapRequest::new(
        PartySnapshot::new(NurseId::new(requestor), requestor.to_uppercase(), identity),
        SwapDetail::Shift {
            from_shift: Some(ShiftCode::N),
            to_shift: Some(ShiftCode::A),
        },
        date,
    )
}

// --- statut affiché -------------------------------------------------------

#[test]
fn pending_request_before_today_is_expired() {
    let r = shift_request("alice", Identity::AnesthesiaSpecialist, day(17));
    assert_eq!(resolve_display_status(&r, day(18)), DisplayStatus::Expired);
}

#[test]
fn pending_request_on_today_is_not_expired() {
    let r = shift_request("alice", Identity::AnesthesiaSpecialist, day(18));
    assert_eq!(resolve_display_status(&r, day(18)), DisplayStatus::Pending);
}

#[test]
fn terminal_status_wins_over_date() {
    for (stored, shown) in [
        (RequestStatus::Accepted, DisplayStatus::Accepted),
        (RequestStatus::Rejected, DisplayStatus::Rejected),
        (RequestStatus::Cancelled, DisplayStatus::Cancelled),
    ] {
        let mut r = shift_request("alice", Identity::AnesthesiaSpecialist, day(1));
        r.status = stored;
        assert_eq!(resolve_display_status(&r, day(18)), shown);
    }
}

#[test]
fn pending_request_without_date_stays_pending() {
    let mut r = shift_request("alice", Identity::AnesthesiaSpecialist, day(1));
    r.from_date = None;
    assert_eq!(resolve_display_status(&r, day(18)), DisplayStatus::Pending);
}

// --- compatibilité ---------------------------------------------------------

#[test]
fn night_then_day_needs_eleven_hours() {
    let bob = NurseId::new("bob");
    let snapshot = ScheduleSnapshot::new().with(day(19), bob.clone(), ShiftCode::N);

    let err = check_compatibility(&snapshot, day(20), ShiftCode::A, &bob, &ScheduleSnapshot::new())
        .unwrap_err();
    assert_eq!(
        err,
        Incompatibility::InsufficientRest {
            before: ShiftCode::N,
            after: ShiftCode::A,
            hours: 11
        }
    );
    insta::assert_snapshot!(err.to_string(), @"N shift followed by A shift requires a minimum rest of 11 hours");
}

#[test]
fn forbidden_pair_names_both_shifts() {
    let bob = NurseId::new("bob");
    let snapshot = ScheduleSnapshot::new().with(day(19), bob.clone(), ShiftCode::N);

    let err = check_compatibility(&snapshot, day(20), ShiftCode::D, &bob, &ScheduleSnapshot::new())
        .unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"N shift cannot be followed by D shift");
}

#[test]
fn next_day_side_is_checked_independently() {
    let bob = NurseId::new("bob");
    let snapshot = ScheduleSnapshot::new().with(day(21), bob.clone(), ShiftCode::A);

    let err = check_compatibility(&snapshot, day(20), ShiftCode::E, &bob, &ScheduleSnapshot::new())
        .unwrap_err();
    assert_eq!(
        err,
        Incompatibility::InsufficientRest {
            before: ShiftCode::E,
            after: ShiftCode::A,
            hours: 11
        }
    );
}

#[test]
fn previous_day_failure_is_reported_first() {
    let bob = NurseId::new("bob");
    let snapshot = ScheduleSnapshot::new()
        .with(day(19), bob.clone(), ShiftCode::N)
        .with(day(21), bob.clone(), ShiftCode::A);

    // N -> D interdit, D -> A demande 8 h : seule la veille est rapportée
    let err = check_compatibility(&snapshot, day(20), ShiftCode::D, &bob, &ScheduleSnapshot::new())
        .unwrap_err();
    assert!(matches!(err, Incompatibility::Forbidden { .. }));
}

#[test]
fn rest_day_neighbours_never_block() {
    let bob = NurseId::new("bob");
    let snapshot = ScheduleSnapshot::new()
        .with(day(19), bob.clone(), ShiftCode::O)
        .with(day(21), bob.clone(), ShiftCode::O);

    for code in ShiftCode::ALL {
        assert!(
            check_compatibility(&snapshot, day(20), code, &bob, &ScheduleSnapshot::new()).is_ok()
        );
    }
}

#[test]
fn tentative_override_takes_precedence() {
    let bob = NurseId::new("bob");
    let snapshot = ScheduleSnapshot::new().with(day(19), bob.clone(), ShiftCode::N);
    let overrides = ScheduleSnapshot::new().with(day(19), bob.clone(), ShiftCode::O);
    assert!(check_compatibility(&snapshot, day(20), ShiftCode::A, &bob, &overrides).is_ok());

    let overrides = ScheduleSnapshot::new().with(day(19), bob.clone(), ShiftCode::E);
    assert!(check_compatibility(&ScheduleSnapshot::new(), day(20), ShiftCode::A, &bob, &overrides).is_err());
}

#[test]
fn other_nurses_do_not_interfere() {
    let snapshot = ScheduleSnapshot::new().with(day(19), NurseId::new("carol"), ShiftCode::N);
    assert!(check_compatibility(
        &snapshot,
        day(20),
        ShiftCode::A,
        &NurseId::new("bob"),
        &ScheduleSnapshot::new()
    )
    .is_ok());
}

#[test]
fn custom_table_drives_the_check() {
    let rules = RuleTable::from_rules([RestRule {
        before: ShiftCode::A,
        after: ShiftCode::N,
        min_rest_hours: 0,
    }])
    .unwrap();
    let bob = NurseId::new("bob");
    let snapshot = ScheduleSnapshot::new().with(day(19), bob.clone(), ShiftCode::N);

    assert!(rules
        .check(&snapshot, day(20), ShiftCode::A, &bob, &ScheduleSnapshot::new())
        .is_ok());
    let snapshot = ScheduleSnapshot::new().with(day(19), bob.clone(), ShiftCode::A);
    assert!(rules
        .check(&snapshot, day(20), ShiftCode::N, &bob, &ScheduleSnapshot::new())
        .is_err());
}

#[test]
fn swap_checks_both_nurses() {
    // alice cède sa nuit (N) et prend la journée (A) de bob le 20
    let r = shift_request("alice", Identity::AnesthesiaSpecialist, day(20));
    let alice = NurseId::new("alice");
    let bob = NurseId::new("bob");

    let ok = ScheduleSnapshot::new()
        .with(day(20), alice.clone(), ShiftCode::N)
        .with(day(20), bob.clone(), ShiftCode::A);
    assert!(check_swap(RuleTable::standard(), &ok, &r, &bob, &ScheduleSnapshot::new()).is_ok());

    // bob reprend la nuit du 20 alors qu'il a une garde D le 21
    let blocked = ok.clone().with(day(21), bob.clone(), ShiftCode::D);
    let err = check_swap(RuleTable::standard(), &blocked, &r, &bob, &ScheduleSnapshot::new())
        .unwrap_err();
    assert_eq!(err.nurse, bob);
    insta::assert_snapshot!(err.to_string(), @"nurse bob: N shift cannot be followed by D shift");

    let tired = ok.with(day(19), alice.clone(), ShiftCode::N);
    let err = check_swap(RuleTable::standard(), &tired, &r, &bob, &ScheduleSnapshot::new())
        .unwrap_err();
    assert_eq!(err.nurse, alice);
}

#[test]
fn swap_without_date_fails_closed() {
    let mut r = shift_request("alice", Identity::AnesthesiaSpecialist, day(20));
    r.from_date = None;
    let err = check_swap(
        RuleTable::standard(),
        &ScheduleSnapshot::new(),
        &r,
        &NurseId::new("bob"),
        &ScheduleSnapshot::new(),
    )
    .unwrap_err();
    assert_eq!(err.reason, Incompatibility::MissingDate);
}

#[test]
fn mission_swap_has_no_rest_rule() {
    let r = ShiftSwapRequest::new(
        PartySnapshot::new(NurseId::new("alice"), "Alice", Identity::RecoveryNurse),
        SwapDetail::Mission {
            from_mission: None,
            to_mission: None,
        },
        day(20),
    );
    assert!(check_swap(
        RuleTable::standard(),
        &ScheduleSnapshot::new(),
        &r,
        &NurseId::new("bob"),
        &ScheduleSnapshot::new()
    )
    .is_ok());
}

// --- éligibilité -----------------------------------------------------------

#[test]
fn cannot_accept_own_request_whatever_the_state() {
    let alice = NurseIdentity::new(NurseId::new("alice"), Role::Admin, Identity::RecoveryNurse);
    for status in [
        RequestStatus::Pending,
        RequestStatus::Accepted,
        RequestStatus::Rejected,
        RequestStatus::Cancelled,
    ] {
        let mut r = shift_request("alice", Identity::AnesthesiaSpecialist, day(20));
        r.status = status;
        r.target_nurse_id = Some(NurseId::new("alice"));
        assert_eq!(can_accept(&r, &alice), Err(AcceptRefusal::OwnRequest));
    }
}

#[test]
fn accept_checks_run_in_order() {
    let bob = nurse("bob", Identity::AnesthesiaSpecialist);

    let mut r = shift_request("alice", Identity::AnesthesiaSpecialist, day(20));
    r.status = RequestStatus::Accepted;
    r.target_nurse_id = Some(NurseId::new("carol"));
    assert_eq!(can_accept(&r, &bob), Err(AcceptRefusal::AlreadyProcessed));

    r.status = RequestStatus::Pending;
    assert_eq!(can_accept(&r, &bob), Err(AcceptRefusal::ReservedForAnother));

    r.target_nurse_id = Some(NurseId::new("bob"));
    assert_eq!(can_accept(&r, &bob), Ok(()));

    let admin = NurseIdentity::new(NurseId::new("bob"), Role::Admin, Identity::AnesthesiaSpecialist);
    assert_eq!(can_accept(&r, &admin), Err(AcceptRefusal::AdminAccount));
    insta::assert_snapshot!(AcceptRefusal::AdminAccount.to_string(), @"admins cannot accept swaps");
}

#[test]
fn recovery_and_anesthesia_cannot_swap_either_way() {
    let r = shift_request("alice", Identity::RecoveryNurse, day(20));
    for identity in [
        Identity::AnesthesiaSpecialist,
        Identity::AnesthesiaLeader,
        Identity::AnesthesiaSecretary,
    ] {
        assert_eq!(
            can_accept(&r, &nurse("bob", identity)),
            Err(AcceptRefusal::CrossCategory)
        );
    }

    let r = shift_request("alice", Identity::AnesthesiaSpecialist, day(20));
    let err = can_accept(&r, &nurse("bob", Identity::RecoveryNurse)).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"different nurse categories cannot swap");

    assert!(can_accept(&r, &nurse("bob", Identity::AnesthesiaLeader)).is_ok());
    assert!(can_accept(&r, &nurse("bob", Identity::parse("ward"))).is_ok());
}

#[test]
fn raw_identities_keep_substring_semantics() {
    let r = shift_request("alice", Identity::parse("night-recovery-team"), day(20));
    assert_eq!(
        can_accept(&r, &nurse("bob", Identity::parse("pediatric-anesthesia"))),
        Err(AcceptRefusal::CrossCategory)
    );
}

#[test]
fn request_without_requestor_identity_is_refused() {
    let mut r = shift_request("alice", Identity::RecoveryNurse, day(20));
    r.requestor = None;
    assert_eq!(
        can_accept(&r, &nurse("bob", Identity::AnesthesiaSpecialist)),
        Err(AcceptRefusal::UnknownRequestor)
    );
    assert_eq!(
        can_accept(&r, &nurse("bob", Identity::RecoveryNurse)),
        Err(AcceptRefusal::UnknownRequestor)
    );
    insta::assert_snapshot!(AcceptRefusal::UnknownRequestor.to_string(), @"requestor identity unknown");

    // les contrôles précédents gardent la priorité
    assert_eq!(
        can_accept(&r, &nurse("alice", Identity::RecoveryNurse)),
        Err(AcceptRefusal::OwnRequest)
    );
}

#[test]
fn expiry_is_a_separate_gate() {
    let r = shift_request("alice", Identity::AnesthesiaSpecialist, day(10));
    let bob = nurse("bob", Identity::AnesthesiaSpecialist);
    assert!(can_accept(&r, &bob).is_ok());
    assert_eq!(check_acceptable(&r, &bob, day(18)), Err(AcceptRefusal::Expired));
    assert!(check_acceptable(&r, &bob, day(10)).is_ok());
}

#[test]
fn expired_pending_request_is_frozen() {
    let r = shift_request("alice", Identity::AnesthesiaSpecialist, day(17));
    let alice = nurse("alice", Identity::AnesthesiaSpecialist);
    let head = NurseIdentity::new(NurseId::new("hn"), Role::HeadNurse, Identity::AnesthesiaSpecialist);
    assert!(!can_delete(&r, &alice, day(18)));
    assert!(!can_delete(&r, &head, day(18)));
    assert!(can_delete(&r, &alice, day(17)));
}

#[test]
fn undated_request_cannot_be_accepted_or_cancelled() {
    let mut r = shift_request("alice", Identity::AnesthesiaSpecialist, day(20));
    r.from_date = None;
    let alice = nurse("alice", Identity::AnesthesiaSpecialist);
    let bob = nurse("bob", Identity::AnesthesiaSpecialist);
    let head = NurseIdentity::new(NurseId::new("hn"), Role::HeadNurse, Identity::AnesthesiaSpecialist);

    assert_eq!(check_acceptable(&r, &bob, day(18)), Err(AcceptRefusal::MissingDate));
    insta::assert_snapshot!(AcceptRefusal::MissingDate.to_string(), @"request has no date");
    assert!(!can_delete(&r, &alice, day(18)));
    assert!(!can_delete(&r, &bob, day(18)));
    // un compte privilégié peut encore la rejeter
    assert!(can_delete(&r, &head, day(18)));
}

#[test]
fn requestor_cancels_only_pending_requests() {
    let alice = nurse("alice", Identity::AnesthesiaSpecialist);
    let mut r = shift_request("alice", Identity::AnesthesiaSpecialist, day(20));
    assert!(can_delete(&r, &alice, day(18)));

    r.status = RequestStatus::Accepted;
    assert!(!can_delete(&r, &alice, day(18)));

    let bob = nurse("bob", Identity::AnesthesiaSpecialist);
    r.status = RequestStatus::Pending;
    assert!(!can_delete(&r, &bob, day(18)));
}

#[test]
fn privileged_users_delete_any_live_request() {
    let leader = nurse("lea", Identity::AnesthesiaLeader);
    let admin = NurseIdentity::new(NurseId::new("root"), Role::Admin, Identity::default());
    let mut r = shift_request("alice", Identity::AnesthesiaSpecialist, day(1));
    r.status = RequestStatus::Accepted;
    assert!(can_delete(&r, &leader, day(18)));
    assert!(can_delete(&r, &admin, day(18)));
}

#[test]
fn delete_button_label_follows_role_and_status() {
    let alice = nurse("alice", Identity::AnesthesiaSpecialist);
    let head = NurseIdentity::new(NurseId::new("hn"), Role::HeadNurse, Identity::AnesthesiaSpecialist);
    let bob = nurse("bob", Identity::AnesthesiaSpecialist);

    let mut r = shift_request("alice", Identity::AnesthesiaSpecialist, day(20));
    assert_eq!(delete_action(&r, &alice), DeleteAction::Cancel);
    assert_eq!(delete_action(&r, &head), DeleteAction::Reject);
    assert_eq!(delete_action(&r, &bob), DeleteAction::Delete);

    r.status = RequestStatus::Accepted;
    assert_eq!(delete_action(&r, &head), DeleteAction::RejectAndRestore);
    assert_eq!(delete_action(&r, &alice), DeleteAction::Delete);
    insta::assert_snapshot!(delete_action(&r, &head).to_string(), @"reject and restore schedule");
}

#[test]
fn only_whitelisted_identities_create_requests() {
    assert!(can_request_swap(&nurse("a", Identity::AnesthesiaSpecialist)));
    assert!(can_request_swap(&nurse("b", Identity::RecoveryNurse)));
    assert!(!can_request_swap(&nurse("c", Identity::AnesthesiaSecretary)));
    assert!(!can_request_swap(&nurse("d", Identity::parse("ward"))));
}
