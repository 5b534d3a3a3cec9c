//! Config subcommand handlers. These run without a station connection.

use dialoguer::{Input, Select};

use synocam_config::{self as cfg, Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::active_profile_name;
use crate::error::CliError;
use crate::output;

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = cfg::config_path();
            eprintln!("synocam — configuration wizard");
            eprintln!("  Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let station: String = Input::new()
                .with_prompt("DiskStation URL")
                .default("https://192.168.1.10:5001".into())
                .interact_text()
                .map_err(prompt_err)?;

            let account: String = Input::new()
                .with_prompt("DSM account")
                .interact_text()
                .map_err(prompt_err)?;

            let pass = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
            if account.is_empty() || pass.is_empty() {
                return Err(CliError::Validation {
                    field: "credentials".into(),
                    reason: "account and password cannot be empty".into(),
                });
            }

            let store_choices = &[
                "Store in system keyring (recommended)",
                "Save to config file (plaintext)",
            ];
            let store_selection = Select::new()
                .with_prompt("Where to store the password?")
                .items(store_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let password_field = if store_selection == 0 {
                cfg::store_password(&profile_name, &pass)?;
                eprintln!("  Password stored in system keyring");
                None
            } else {
                Some(pass)
            };

            let profile = Profile {
                station,
                account: Some(account),
                password: password_field,
                password_env: None,
                ca_cert: None,
                insecure: None,
                timeout: None,
                poll_interval: None,
                snapshot_stream: None,
            };

            let mut config = cfg::load_config_or_default();
            config.default_profile = Some(profile_name.clone());
            config.profiles.insert(profile_name.clone(), profile);
            cfg::save_config(&config)?;

            eprintln!("\nConfiguration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: synocam cameras list");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let config = redacted(cfg::load_config_or_default());
            let out = output::render_single(
                &global.output,
                &config,
                |c| toml::to_string_pretty(c).unwrap_or_else(|_| format!("{c:#?}")),
                |c| c.default_profile.clone().unwrap_or_else(|| "default".into()),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", cfg::config_path().display());
            Ok(())
        }

        // ── SetPassword ─────────────────────────────────────────────
        ConfigCommand::SetPassword => {
            let config = cfg::load_config_or_default();
            let profile_name = active_profile_name(global, &config);

            if !config.profiles.contains_key(&profile_name) {
                return Err(CliError::ProfileNotFound { name: profile_name });
            }

            let pass = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
            if pass.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "password cannot be empty".into(),
                });
            }

            cfg::store_password(&profile_name, &pass)?;
            eprintln!("Password stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}

/// Blank out plaintext passwords before displaying the config.
fn redacted(mut config: Config) -> Config {
    for profile in config.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some("<redacted>".into());
        }
    }
    config
}
