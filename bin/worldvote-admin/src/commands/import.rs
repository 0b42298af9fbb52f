//! Bulk import of students and participants from JSON files.
//!
//! Both imports are idempotent: rows whose unique key already exists are
//! skipped, so a partially-applied file can simply be re-run.

use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StudentRow {
    email: String,
    password: String,
    #[serde(default)]
    full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParticipantRow {
    serial_number: String,
    video_url: String,
}

/// Import students, hashing each password with argon2id.
pub fn students(db_path: &Path, file: &Path) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {}", file.display(), e))?;
    let rows: Vec<StudentRow> = serde_json::from_str(&raw)?;

    let coordinator = super::open(db_path)?;
    let store = coordinator.students();

    let mut added = 0usize;
    let mut skipped = 0usize;

    for (i, row) in rows.iter().enumerate() {
        let email = row.email.trim().to_lowercase();
        if email.is_empty() || row.password.is_empty() {
            eprintln!("row {}: empty email or password, skipping", i + 1);
            skipped += 1;
            continue;
        }

        if store.find_by_email(&email)?.is_some() {
            skipped += 1;
            continue;
        }

        let hash = hash_password(&row.password)?;
        store.create(&email, &hash, row.full_name.as_deref())?;
        added += 1;
    }

    println!(
        "Imported {added} students ({skipped} skipped) from {} rows.",
        rows.len()
    );
    Ok(())
}

/// Import participants by unique serial number.
pub fn participants(db_path: &Path, file: &Path) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {}", file.display(), e))?;
    let rows: Vec<ParticipantRow> = serde_json::from_str(&raw)?;

    let coordinator = super::open(db_path)?;
    let store = coordinator.participants();

    let mut added = 0usize;
    let mut skipped = 0usize;

    for (i, row) in rows.iter().enumerate() {
        let serial = row.serial_number.trim();
        if serial.is_empty() || row.video_url.trim().is_empty() {
            eprintln!("row {}: empty serial number or video url, skipping", i + 1);
            skipped += 1;
            continue;
        }

        if store.find_by_serial(serial)?.is_some() {
            skipped += 1;
            continue;
        }

        store.create(serial, row.video_url.trim())?;
        added += 1;
    }

    println!(
        "Imported {added} participants ({skipped} skipped) from {} rows.",
        rows.len()
    );
    Ok(())
}

/// Hash a password into an argon2id PHC string.
fn hash_password(password: &str) -> anyhow::Result<String> {
    use argon2::Argon2;
    use password_hash::rand_core::OsRng;
    use password_hash::{PasswordHasher, SaltString};

    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("failed to hash password: {}", e))?
        .to_string())
}
