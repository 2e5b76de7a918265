//! Flat-file persistence for the user store.
//!
//! One record per user, nine newline-terminated fields followed by a `---`
//! separator line:
//!
//! ```text
//! id
//! username
//! email
//! password hash
//! total score
//! games played
//! games won
//! created at (unix seconds)
//! last login (unix seconds)
//! ---
//! ```
//!
//! The whole file is rewritten on every save. Sessions are never stored.

use std::{
    fmt::Write as _,
    fs, io,
    path::{Path, PathBuf},
    str::FromStr,
};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::User;

const RECORD_SEPARATOR: &str = "---";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("user store I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("malformed user store at line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

pub struct UserFile {
    path: PathBuf,
}

impl UserFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record. A missing file is an empty store.
    pub fn load(&self) -> Result<Vec<User>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let users = parse(&content)?;
        tracing::info!(
            "Loaded {} users from {}",
            users.len(),
            self.path.display()
        );
        Ok(users)
    }

    /// Rewrite the file with exactly these users.
    ///
    /// Written to a sibling temp file first and renamed into place, so readers
    /// see either the old or the new store.
    pub fn save<'a, I>(&self, users: I) -> Result<(), StorageError>
    where
        I: IntoIterator<Item = &'a User>,
    {
        let content = render(users);

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn render<'a, I>(users: I) -> String
where
    I: IntoIterator<Item = &'a User>,
{
    let mut out = String::new();
    for user in users {
        // Writing into a String cannot fail
        let _ = writeln!(
            out,
            "{}\n{}\n{}\n{}\n{}\n{}\n{}\n{}\n{}\n{}",
            user.id,
            user.username,
            user.email,
            user.password_hash,
            user.total_score,
            user.games_played,
            user.games_won,
            user.created_at.timestamp(),
            user.last_login.timestamp(),
            RECORD_SEPARATOR,
        );
    }
    out
}

fn parse(content: &str) -> Result<Vec<User>, StorageError> {
    let mut lines = Lines {
        inner: content.lines(),
        line: 0,
    };
    let mut users = Vec::new();

    while let Some(id) = lines.next_record_start() {
        let user = User {
            id: id.to_string(),
            username: lines.field("username")?.to_string(),
            email: lines.field("email")?.to_string(),
            password_hash: lines.field("password hash")?.to_string(),
            total_score: lines.number("total score")?,
            games_played: lines.number("games played")?,
            games_won: lines.number("games won")?,
            created_at: lines.timestamp("created at")?,
            last_login: lines.timestamp("last login")?,
        };

        match lines.next_line() {
            None | Some(RECORD_SEPARATOR) => users.push(user),
            Some(other) => {
                return Err(lines.malformed(format!(
                    "expected record separator, found {:?}",
                    other
                )))
            }
        }
    }

    Ok(users)
}

struct Lines<'a> {
    inner: std::str::Lines<'a>,
    line: usize,
}

impl<'a> Lines<'a> {
    fn next_line(&mut self) -> Option<&'a str> {
        let next = self.inner.next()?;
        self.line += 1;
        Some(next)
    }

    /// Skip stray separators and blank lines between records
    fn next_record_start(&mut self) -> Option<&'a str> {
        loop {
            let line = self.next_line()?;
            if line != RECORD_SEPARATOR && !line.trim().is_empty() {
                return Some(line);
            }
        }
    }

    fn field(&mut self, name: &str) -> Result<&'a str, StorageError> {
        self.next_line()
            .ok_or_else(|| self.malformed(format!("record truncated before {}", name)))
    }

    fn number<T: FromStr>(&mut self, name: &str) -> Result<T, StorageError> {
        let raw = self.field(name)?;
        raw.trim()
            .parse()
            .map_err(|_| self.malformed(format!("{} is not a number: {:?}", name, raw)))
    }

    fn timestamp(&mut self, name: &str) -> Result<DateTime<Utc>, StorageError> {
        let secs: i64 = self.number(name)?;
        DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| self.malformed(format!("{} is out of range: {}", name, secs)))
    }

    fn malformed(&self, reason: String) -> StorageError {
        StorageError::Malformed {
            line: self.line,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, username: &str) -> User {
        let mut u = User::new(
            id.to_string(),
            username.to_string(),
            format!("{}@example.com", username),
            "ab12".to_string(),
        );
        u.total_score = 120;
        u.games_played = 3;
        u.games_won = 2;
        u.created_at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        u.last_login = DateTime::from_timestamp(1_700_000_500, 0).unwrap();
        u
    }

    #[test]
    fn test_record_layout() {
        let rendered = render([&user("u1", "alice")]);
        assert_eq!(
            rendered,
            "u1\nalice\nalice@example.com\nab12\n120\n3\n2\n1700000000\n1700000500\n---\n"
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let file = UserFile::new(dir.path().join("users.dat"));
        let users = vec![user("u1", "alice"), user("u2", "bob")];

        file.save(&users).unwrap();
        let loaded = file.load().unwrap();
        assert_eq!(loaded, users);
        assert!(!dir.path().join("users.dat.tmp").exists());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = UserFile::new(dir.path().join("absent.dat"));
        assert!(file.load().unwrap().is_empty());
    }

    #[test]
    fn test_last_record_without_separator() {
        let users = parse("u1\nalice\na@x\nh\n5\n1\n0\n10\n20\n").unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].total_score, 5);
        assert_eq!(users[0].last_login.timestamp(), 20);
    }

    #[test]
    fn test_truncated_record() {
        let err = parse("u1\nalice\na@x\n").unwrap_err();
        assert!(matches!(err, StorageError::Malformed { line: 3, .. }));
    }

    #[test]
    fn test_non_numeric_field() {
        let err = parse("u1\nalice\na@x\nh\nlots\n1\n0\n10\n20\n---\n").unwrap_err();
        match err {
            StorageError::Malformed { line, reason } => {
                assert_eq!(line, 5);
                assert!(reason.contains("total score"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
