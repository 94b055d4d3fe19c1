//! File-backed profile session.
//!
//! At most one profile is stored. Writing it signs the user in, and
//! removing the file signs them out.

use std::path::{Path, PathBuf};

use nb_domain::error::{Error, Result};
use nb_domain::profile::UserProfile;
use nb_domain::trace::TraceEvent;

const DEFAULT_DIR: &str = ".neurobot";
const DEFAULT_FILE: &str = "sisst_user.json";

pub const CREDENTIALS_NOT_FOUND: &str = "Credenciales no encontradas. Si acabas de registrarte, \
     asegúrate de usar el email corporativo correcto.";

#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `configured` if set, else at `~/.neurobot/sisst_user.json`.
    pub fn from_config(configured: Option<&str>) -> Result<Self> {
        match configured {
            Some(p) if !p.trim().is_empty() => Ok(Self::new(p)),
            _ => Self::default_path().map(Self::new),
        }
    }

    pub fn default_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(DEFAULT_DIR).join(DEFAULT_FILE))
            .ok_or_else(|| Error::Config("cannot determine home directory".into()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored profile. A missing file is `None`. An unreadable or
    /// corrupt record is logged and also treated as `None`.
    pub fn load(&self) -> Result<Option<UserProfile>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::Io(e)),
        };
        match serde_json::from_str(&raw) {
            Ok(profile) => Ok(Some(profile)),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "stored profile is corrupt, ignoring"
                );
                Ok(None)
            }
        }
    }

    pub fn save(&self, profile: &UserProfile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(profile)?;
        std::fs::write(&self.path, json).map_err(Error::Io)?;
        TraceEvent::ProfileStored {
            email: profile.email.clone(),
        }
        .emit();
        Ok(())
    }

    /// Validate and store a newly registered profile.
    pub fn register(&self, profile: &UserProfile) -> Result<()> {
        let required = [
            ("name", &profile.name),
            ("role", &profile.role),
            ("company.companyName", &profile.company.company_name),
            ("company.taxId", &profile.company.tax_id),
            ("company.officeLocation", &profile.company.office_location),
            ("company.workEmail", &profile.company.work_email),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(Error::InvalidInput(format!("{field} is required")));
        }
        self.save(profile)
    }

    /// Sign in as the stored user if `email` matches its personal or work
    /// address.
    pub fn login(&self, email: &str) -> Result<UserProfile> {
        match self.load()? {
            Some(profile) if profile.matches_email(email) => Ok(profile),
            _ => Err(Error::Auth(CREDENTIALS_NOT_FOUND.into())),
        }
    }

    /// Sign in with the built-in demo account, replacing any stored profile.
    pub fn login_demo(&self) -> Result<UserProfile> {
        let profile = UserProfile::demo();
        self.save(&profile)?;
        Ok(profile)
    }

    /// Remove the stored profile. Clearing an empty store is not an error.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(Error::Io(e)),
        }
        TraceEvent::ProfileCleared.emit();
        Ok(())
    }
}
