use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Administrador,
    Profesor,
    Auxiliar,
}

impl Role {
    pub fn dashboard(self) -> &'static str {
        match self {
            Role::Administrador => "/admin",
            Role::Profesor => "/teacher",
            Role::Auxiliar => "/assistant",
        }
    }
}

/// A portal account as exposed to callers. Never carries the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u32,
    pub username: String,
    pub role: Role,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assigned_classrooms: Vec<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Administrador
    }

    /// Assistants are limited to their assigned classrooms.
    pub fn can_access_classroom(&self, code: &str) -> bool {
        match self.role {
            Role::Auxiliar => self.assigned_classrooms.iter().any(|c| c == code),
            _ => true,
        }
    }
}

struct Account {
    id: u32,
    username: &'static str,
    password: &'static str,
    role: Role,
    name: &'static str,
    email: &'static str,
    assigned: &'static [&'static str],
}

impl Account {
    fn user(&self) -> User {
        User {
            id: self.id,
            username: self.username.to_string(),
            role: self.role,
            name: self.name.to_string(),
            email: self.email.to_string(),
            assigned_classrooms: self.assigned.iter().map(|c| c.to_string()).collect(),
        }
    }
}

static ACCOUNTS: [Account; 6] = [
    Account {
        id: 1,
        username: "admin",
        password: "admin123",
        role: Role::Administrador,
        name: "Administrador del Sistema",
        email: "admin@joaquincapelo.edu.pe",
        assigned: &[],
    },
    Account {
        id: 2,
        username: "profesor1",
        password: "prof123",
        role: Role::Profesor,
        name: "María González",
        email: "maria.gonzalez@joaquincapelo.edu.pe",
        assigned: &[],
    },
    Account {
        id: 3,
        username: "profesor2",
        password: "prof123",
        role: Role::Profesor,
        name: "Carlos Mendoza",
        email: "carlos.mendoza@joaquincapelo.edu.pe",
        assigned: &[],
    },
    Account {
        id: 4,
        username: "auxiliar1",
        password: "aux123",
        role: Role::Auxiliar,
        name: "Ana Rodríguez",
        email: "ana.rodriguez@joaquincapelo.edu.pe",
        assigned: &["100", "101", "102", "103"],
    },
    Account {
        id: 5,
        username: "auxiliar2",
        password: "aux123",
        role: Role::Auxiliar,
        name: "Luis Pérez",
        email: "luis.perez@joaquincapelo.edu.pe",
        assigned: &["104", "105", "106", "107"],
    },
    Account {
        id: 6,
        username: "auxiliar3",
        password: "aux123",
        role: Role::Auxiliar,
        name: "Carmen Silva",
        email: "carmen.silva@joaquincapelo.edu.pe",
        assigned: &["200", "201", "202", "203"],
    },
];

/// Plain credential match against the static account list.
pub fn authenticate(username: &str, password: &str) -> Option<User> {
    ACCOUNTS
        .iter()
        .find(|a| a.username == username && a.password == password)
        .map(Account::user)
}

fn known_user(username: &str) -> Option<User> {
    ACCOUNTS
        .iter()
        .find(|a| a.username == username)
        .map(Account::user)
}

/// The logged-in user, optionally mirrored to a JSON file so it survives a
/// restart.
#[derive(Debug, Default)]
pub struct SessionContext {
    current: Option<User>,
    path: Option<PathBuf>,
}

impl SessionContext {
    pub fn new(path: Option<PathBuf>) -> SessionContext {
        SessionContext {
            current: None,
            path,
        }
    }

    pub fn current(&self) -> Option<&User> {
        self.current.as_ref()
    }

    /// Reads the persisted user, if any. A stored user that no longer exists
    /// in the account list is dropped.
    pub fn load(&mut self) -> anyhow::Result<()> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        if !path.is_file() {
            self.current = None;
            return Ok(());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read session file {}", path.to_string_lossy()))?;
        let stored: User = serde_json::from_str(&text)
            .with_context(|| format!("session file {} is invalid", path.to_string_lossy()))?;
        self.current = known_user(&stored.username);
        Ok(())
    }

    /// Mirrors `user` to the session file. Callers update `current` only
    /// after this succeeds.
    fn persist(&self, user: Option<&User>) -> anyhow::Result<()> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        match user {
            Some(user) => write_session_file(path, user),
            None => {
                if path.exists() {
                    std::fs::remove_file(path).with_context(|| {
                        format!("failed to remove session file {}", path.to_string_lossy())
                    })?;
                }
                Ok(())
            }
        }
    }

    /// `Ok(None)` means the credentials did not match. On `Ok(None)` or
    /// `Err` the previous session is left untouched.
    pub fn login(&mut self, username: &str, password: &str) -> anyhow::Result<Option<&User>> {
        let Some(user) = authenticate(username, password) else {
            return Ok(None);
        };
        self.persist(Some(&user))?;
        self.current = Some(user);
        Ok(self.current.as_ref())
    }

    /// Returns whether a user was logged in. The user stays logged in if
    /// the session file cannot be removed.
    pub fn clear(&mut self) -> anyhow::Result<bool> {
        self.persist(None)?;
        Ok(self.current.take().is_some())
    }
}

fn write_session_file(path: &Path, user: &User) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.to_string_lossy()))?;
    }
    let text = serde_json::to_string_pretty(user).context("failed to serialize session")?;
    std::fs::write(path, text)
        .with_context(|| format!("failed to write session file {}", path.to_string_lossy()))
}
