use club_portal::auth::{
    AccessLevel, Decision, MUST_LOG_IN, NOT_AUTHORIZED, Principal, Role, evaluate_access,
};
use uuid::Uuid;

fn principal(role_code: i16) -> Principal {
    Principal {
        id: Uuid::from_u128(1),
        username: "tester".to_string(),
        role_code,
    }
}

// --- Member level ---

#[test]
fn member_gate_redirects_anonymous_home() {
    assert_eq!(
        evaluate_access(None, AccessLevel::Member),
        Decision::RedirectHome {
            reason: MUST_LOG_IN
        }
    );
}

#[test]
fn member_gate_blocks_inactive_with_render() {
    assert_eq!(
        evaluate_access(Some(&principal(0)), AccessLevel::Member),
        Decision::RenderInactive
    );
}

#[test]
fn member_gate_admits_every_active_role() {
    for code in [1, 2, 3] {
        assert_eq!(
            evaluate_access(Some(&principal(code)), AccessLevel::Member),
            Decision::Admit,
            "role code {} should be admitted at member level",
            code
        );
    }
}

#[test]
fn member_gate_never_admits_unknown_role_codes() {
    for code in [-1, 4, 7, 99] {
        assert_eq!(
            evaluate_access(Some(&principal(code)), AccessLevel::Member),
            Decision::RedirectBack {
                reason: NOT_AUTHORIZED
            },
            "unknown role code {} must be treated as insufficient privilege",
            code
        );
    }
}

// --- Management level ---

#[test]
fn management_gate_redirects_anonymous_home() {
    assert_eq!(
        evaluate_access(None, AccessLevel::Management),
        Decision::RedirectHome {
            reason: MUST_LOG_IN
        }
    );
}

#[test]
fn management_gate_admits_only_management() {
    assert_eq!(
        evaluate_access(Some(&principal(3)), AccessLevel::Management),
        Decision::Admit
    );
    for code in [0, 1, 2, 5] {
        assert_eq!(
            evaluate_access(Some(&principal(code)), AccessLevel::Management),
            Decision::RedirectBack {
                reason: NOT_AUTHORIZED
            },
            "role code {} must not reach the control panel",
            code
        );
    }
}

// --- Role mapping ---

#[test]
fn role_codes_round_trip() {
    for role in [Role::Inactive, Role::Player, Role::Member, Role::Management] {
        assert_eq!(Role::from_code(role.code()), Some(role));
    }
    assert_eq!(Role::from_code(42), None);
}

#[test]
fn role_satisfaction_table() {
    assert!(!Role::Inactive.satisfies(AccessLevel::Member));
    assert!(Role::Player.satisfies(AccessLevel::Member));
    assert!(Role::Member.satisfies(AccessLevel::Member));
    assert!(Role::Management.satisfies(AccessLevel::Member));

    assert!(!Role::Inactive.satisfies(AccessLevel::Management));
    assert!(!Role::Player.satisfies(AccessLevel::Management));
    assert!(!Role::Member.satisfies(AccessLevel::Management));
    assert!(Role::Management.satisfies(AccessLevel::Management));
}
