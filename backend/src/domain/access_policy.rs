//! Ownership and role rules for owned resources and account management.
//!
//! Every check is a plain function over identities, so handlers and services
//! call them explicitly at the start of each use-case.

use super::{AccessError, AccountId, Role};

/// Operation requested on an owned resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Create a record. Always allowed; services stamp the caller as owner.
    Create,
    /// Fetch a single record.
    Read,
    /// Modify a record in place.
    Update,
    /// Remove a record.
    Delete,
}

/// Authenticated identity acting on a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    id: AccountId,
    role: Role,
}

impl Caller {
    /// Build a caller from a freshly loaded account id and role.
    pub fn new(id: AccountId, role: Role) -> Self {
        Self { id, role }
    }

    /// Identity of the caller.
    pub fn id(&self) -> AccountId {
        self.id
    }

    /// Role of the caller at load time.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Whether the caller holds administrator rights.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Decide whether `requester_id` may perform `operation` on a resource
/// owned by `owner_id`.
///
/// # Examples
/// ```
/// use notekeeper::domain::{AccountId, Operation, can_access};
///
/// let owner = AccountId::random();
/// let other = AccountId::random();
/// assert!(can_access(owner, owner, false, Operation::Read));
/// assert!(!can_access(owner, other, false, Operation::Read));
/// assert!(can_access(owner, other, true, Operation::Delete));
/// ```
pub fn can_access(
    owner_id: AccountId,
    requester_id: AccountId,
    requester_is_admin: bool,
    operation: Operation,
) -> bool {
    match operation {
        Operation::Create => true,
        Operation::Read | Operation::Update | Operation::Delete => {
            requester_is_admin || owner_id == requester_id
        }
    }
}

/// Guard form of [`can_access`] for services.
pub fn authorize(caller: &Caller, owner_id: AccountId, operation: Operation) -> Result<(), AccessError> {
    if can_access(owner_id, caller.id(), caller.is_admin(), operation) {
        Ok(())
    } else {
        Err(AccessError::AuthorizationDenied)
    }
}

/// Gate for account-management operations; ownership is irrelevant here.
pub fn require_admin(caller: &Caller) -> Result<(), AccessError> {
    if caller.is_admin() {
        Ok(())
    } else {
        Err(AccessError::AuthorizationDenied)
    }
}

/// Reject an administrator deleting their own account via admin-delete.
pub fn ensure_not_self(caller: &Caller, target: AccountId) -> Result<(), AccessError> {
    if caller.id() == target {
        Err(AccessError::SelfDeletionForbidden)
    } else {
        Ok(())
    }
}
