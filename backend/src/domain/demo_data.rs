//! Demo accounts and notes for local development.
//!
//! Seeding is idempotent: accounts whose username already exists are left
//! alone, together with their notes.

use tracing::{info, warn};

use super::{AccessError, AccountService, NoteDraft, NoteRegistry, Role};

struct DemoAccount {
    username: &'static str,
    email: &'static str,
    password: &'static str,
    role: Role,
    notes: &'static [(&'static str, &'static str)],
}

const DEMO_ACCOUNTS: &[DemoAccount] = &[
    DemoAccount {
        username: "admin",
        email: "admin@example.com",
        password: "admin123",
        role: Role::Administrator,
        notes: &[(
            "Welcome",
            "Welcome to the notes manager! This sample note belongs to the administrator.",
        )],
    },
    DemoAccount {
        username: "user",
        email: "user@example.com",
        password: "user123",
        role: Role::Standard,
        notes: &[
            (
                "My first note",
                "This is my first note. I can keep important information here.",
            ),
            (
                "To do",
                "1. Finish the lab\n2. Exercise the API\n3. Write the report",
            ),
        ],
    },
];

/// Outcome of a seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub accounts_created: usize,
    pub accounts_skipped: usize,
    pub notes_created: usize,
}

/// Create the demo accounts and their notes when absent.
pub async fn seed(accounts: &AccountService, notes: &NoteRegistry) -> Result<SeedSummary, AccessError> {
    let mut summary = SeedSummary::default();
    for demo in DEMO_ACCOUNTS {
        if accounts.registry().exists_by_username(demo.username).await? {
            summary.accounts_skipped += 1;
            continue;
        }

        let provisioned = accounts
            .provision(demo.username, demo.email, demo.password, demo.role)
            .await;
        let account = match provisioned {
            Ok(account) => account,
            Err(AccessError::DuplicateUsername | AccessError::DuplicateEmail) => {
                summary.accounts_skipped += 1;
                continue;
            }
            Err(err) => return Err(err),
        };
        summary.accounts_created += 1;
        warn!(
            username = demo.username,
            role = %demo.role,
            "seeded demo account with a well-known password"
        );

        for (title, content) in demo.notes {
            notes.create(account.id(), &NoteDraft::new(*title, *content)).await?;
            summary.notes_created += 1;
        }
    }
    info!(
        accounts_created = summary.accounts_created,
        accounts_skipped = summary.accounts_skipped,
        notes_created = summary.notes_created,
        "demo data seeded"
    );
    Ok(summary)
}
