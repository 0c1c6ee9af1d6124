//! # Authentication Gate & Session
//!
//! Resolves a username/password pair against the Staff sheet and produces a
//! [`Session`]. The scheme is deliberately low-assurance (plain-text cells
//! in a spreadsheet, no token expiry) - it gates views, it does not defend
//! anything.
//!
//! ## Session Lifecycle
//!
//! The old dashboard scattered ambient local-storage reads across every
//! view. Here the session is an explicit object with a defined lifecycle:
//! created on login, cleared on logout, read-only everywhere else - all
//! through [`SessionManager`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use karobar_core::table::Table;
use karobar_core::types::Role;

use crate::client::SheetsClient;
use crate::error::{SheetsError, SheetsResult};

/// Sheet name the staff records live in.
pub const STAFF_SHEET: &str = "Staff";

// =============================================================================
// Session
// =============================================================================

/// An authenticated staff session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Session identifier (UUID v4), minted at login.
    pub id: String,
    pub staff_id: String,
    pub name: String,
    pub username: String,
    pub mobile: String,
    /// Canonical role driving which views render.
    pub role: Role,
    pub last_login: DateTime<Utc>,
}

// =============================================================================
// Credential Check
// =============================================================================

/// Verifies credentials against an already-fetched Staff table.
///
/// Usernames compare case-insensitively after trimming; passwords compare
/// exactly. The free-text role cell maps through [`Role::from_source`]
/// (unrecognized values become `Sales`).
pub fn authenticate(
    staff: &Table,
    username: &str,
    password: &str,
    now: DateTime<Utc>,
) -> SheetsResult<Session> {
    let col_username = staff.column_any(&["username", "user"]);
    let col_password = staff.column_any(&["password", "pass"]);
    let col_staff_id = staff.column_any(&["staff_id", "staff id", "id"]);
    let col_name = staff.column_any(&["name"]);
    let col_mobile = staff.column_any(&["mobile", "phone"]);
    let col_role = staff.column_any(&["role"]);

    let wanted = username.trim();
    for row in staff.rows() {
        let row_username = row.cell(col_username);
        if row_username.is_empty() || !row_username.eq_ignore_ascii_case(wanted) {
            continue;
        }
        // untrimmed read: the password cell is the one field where
        // surrounding whitespace is part of the value
        if row.cell_raw(col_password) != password {
            // username matched, password did not: same opaque error,
            // keep scanning in case of duplicate usernames
            continue;
        }

        let role = Role::from_source(row.cell(col_role));
        info!(username = row_username, role = role.as_str(), "staff login");
        return Ok(Session {
            id: Uuid::new_v4().to_string(),
            staff_id: row.cell(col_staff_id).to_string(),
            name: row.cell(col_name).to_string(),
            username: row_username.to_string(),
            mobile: row.cell(col_mobile).to_string(),
            role,
            last_login: now,
        });
    }

    debug!(username = wanted, "login rejected");
    Err(SheetsError::InvalidCredentials)
}

impl SheetsClient {
    /// Fetches the Staff sheet and verifies credentials against it.
    pub async fn login(&self, username: &str, password: &str) -> SheetsResult<Session> {
        let staff = self.fetch_table(STAFF_SHEET).await?;
        authenticate(&staff, username, password, Utc::now())
    }
}

// =============================================================================
// Session Manager
// =============================================================================

/// Holds the one active session with an explicit lifecycle.
///
/// Create on login, clear on logout, read-only everywhere else. Views get
/// `current()`, never a mutable handle.
#[derive(Debug, Default)]
pub struct SessionManager {
    current: Option<Session>,
}

impl SessionManager {
    pub fn new() -> Self {
        SessionManager::default()
    }

    /// Stores the session produced by a successful login, replacing any
    /// previous one.
    pub fn login(&mut self, session: Session) {
        info!(username = %session.username, "session created");
        self.current = Some(session);
    }

    /// Clears the session.
    pub fn logout(&mut self) {
        if let Some(session) = self.current.take() {
            info!(username = %session.username, "session cleared");
        }
    }

    /// The active session, if any.
    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// True when the active session carries the given role.
    pub fn has_role(&self, role: Role) -> bool {
        self.current.as_ref().is_some_and(|s| s.role == role)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn staff_table() -> Table {
        Table::from_grid(
            [
                ["Staff_ID", "Name", "Username", "Password", "Mobile", "Role"].as_slice(),
                ["ST-1", "Imran", "imran", "secret1", "0300-1", "Admin"].as_slice(),
                ["ST-2", "Bilal", "bilal", "secret2", "0300-2", "Delivery Boy"].as_slice(),
                ["ST-3", "Sana", "sana", "secret3", "0300-3", "accounts"].as_slice(),
            ]
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect(),
        )
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn test_authenticate_success_and_role_mapping() {
        let session = authenticate(&staff_table(), "imran", "secret1", now()).unwrap();
        assert_eq!(session.staff_id, "ST-1");
        assert_eq!(session.role, Role::Admin);
        assert!(!session.id.is_empty());

        // free-text rider role
        let session = authenticate(&staff_table(), "bilal", "secret2", now()).unwrap();
        assert_eq!(session.role, Role::Rider);

        // unrecognized role defaults to sales
        let session = authenticate(&staff_table(), "sana", "secret3", now()).unwrap();
        assert_eq!(session.role, Role::Sales);
    }

    #[test]
    fn test_authenticate_username_case_insensitive() {
        let session = authenticate(&staff_table(), "  IMRAN ", "secret1", now()).unwrap();
        assert_eq!(session.username, "imran");
    }

    #[test]
    fn test_authenticate_password_exact() {
        assert!(matches!(
            authenticate(&staff_table(), "imran", "SECRET1", now()),
            Err(SheetsError::InvalidCredentials)
        ));
        assert!(matches!(
            authenticate(&staff_table(), "nobody", "secret1", now()),
            Err(SheetsError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_authenticate_password_whitespace_significant() {
        let staff = Table::from_grid(
            [
                ["Staff_ID", "Name", "Username", "Password", "Mobile", "Role"].as_slice(),
                ["ST-9", "Asad", "asad", " spaced ", "0300-9", "Admin"].as_slice(),
            ]
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect(),
        );

        // the stored cell includes its padding; only the exact string matches
        assert!(authenticate(&staff, "asad", " spaced ", now()).is_ok());
        assert!(matches!(
            authenticate(&staff, "asad", "spaced", now()),
            Err(SheetsError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_session_lifecycle() {
        let mut manager = SessionManager::new();
        assert!(manager.current().is_none());

        let session = authenticate(&staff_table(), "imran", "secret1", now()).unwrap();
        manager.login(session);
        assert!(manager.current().is_some());
        assert!(manager.has_role(Role::Admin));
        assert!(!manager.has_role(Role::Rider));

        manager.logout();
        assert!(manager.current().is_none());
        assert!(!manager.has_role(Role::Admin));
    }
}
