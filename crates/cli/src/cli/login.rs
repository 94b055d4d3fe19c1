//! Profile session commands: `login`, `register`, `logout`, `whoami`.

use nb_domain::config::Config;
use nb_domain::profile::{CompanyInfo, UserProfile};
use nb_sessions::ProfileStore;

use super::RegisterArgs;

fn store(config: &Config) -> anyhow::Result<ProfileStore> {
    Ok(ProfileStore::from_config(config.session.profile_path.as_deref())?)
}

pub fn login(config: &Config, email: Option<String>, demo: bool) -> anyhow::Result<()> {
    let store = store(config)?;
    let profile = if demo {
        store.login_demo()?
    } else {
        let Some(email) = email else {
            anyhow::bail!("pass an email or --demo");
        };
        store.login(&email)?
    };
    eprintln!("Bienvenido, {}.", profile.name);
    Ok(())
}

pub fn register(config: &Config, args: RegisterArgs) -> anyhow::Result<()> {
    let store = store(config)?;
    let profile = profile_from_args(args);
    store.register(&profile)?;
    eprintln!("Perfil creado para {} ({}).", profile.name, profile.email);
    Ok(())
}

pub fn logout(config: &Config) -> anyhow::Result<()> {
    store(config)?.clear()?;
    eprintln!("Sesión cerrada.");
    Ok(())
}

/// Returns `false` when nobody is signed in.
pub fn whoami(config: &Config) -> anyhow::Result<bool> {
    match store(config)?.load()? {
        Some(p) => {
            println!("{} <{}>", p.name, p.email);
            println!("  role:    {}", p.role);
            println!("  company: {}", p.company.company_name);
            if !p.company.office_location.is_empty() {
                println!("  office:  {}", p.company.office_location);
            }
            Ok(true)
        }
        None => {
            eprintln!("Not signed in.");
            Ok(false)
        }
    }
}

fn profile_from_args(args: RegisterArgs) -> UserProfile {
    let email = args.email.trim().to_string();
    UserProfile {
        name: args.name.trim().to_string(),
        email: email.clone(),
        role: args.role,
        company: CompanyInfo {
            company_name: args.company,
            tax_id: args.tax_id,
            industry: "Tecnología".into(),
            employee_count: "N/A".into(),
            department: args.department,
            office_location: args.office,
            work_email: email,
            phone: args.phone,
        },
    }
}
