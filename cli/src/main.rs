use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use encounter_engine::api::{self, AssessConfig, ComposeConfig};
use encounter_engine::experience::role_xp;
use encounter_engine::{CampaignSettings, Role, RoleFlag, RoleType};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, ValueEnum)]
enum RoleArg {
    Minion,
    Standard,
    Elite,
    Solo,
}

#[derive(Subcommand)]
enum Cmd {
    /// Compose a creature with templates, theme and level adjustment
    Stats {
        /// Library file (YAML or JSON), or `builtin`
        #[arg(long, default_value = api::BUILTIN)]
        library: String,
        /// Campaign settings file overriding the library's settings
        #[arg(long)]
        settings: Option<String>,
        #[arg(long)]
        creature: String,
        /// Template id; repeat to apply several in order
        #[arg(long = "template")]
        templates: Vec<String>,
        #[arg(long)]
        theme: Option<String>,
        #[arg(long)]
        theme_attack: Option<String>,
        #[arg(long)]
        theme_utility: Option<String>,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        level_adjustment: i32,
        /// Print YAML instead of JSON
        #[arg(long)]
        yaml: bool,
    },
    /// XP, level and difficulty of an encounter against a party
    Assess {
        #[arg(long, default_value = api::BUILTIN)]
        library: String,
        #[arg(long)]
        settings: Option<String>,
        /// Encounter file, or the name of a built-in encounter
        #[arg(long)]
        encounter: String,
        #[arg(long)]
        party_level: i32,
        #[arg(long, default_value_t = 5)]
        party_size: i32,
        #[arg(long)]
        yaml: bool,
    },
    /// Theme powers a creature's role can take
    ThemePowers {
        #[arg(long, default_value = api::BUILTIN)]
        library: String,
        #[arg(long)]
        theme: String,
        /// Restrict to powers suited to this creature's role
        #[arg(long)]
        creature: Option<String>,
        #[arg(long)]
        yaml: bool,
    },
    /// XP value of a single creature
    Xp {
        #[arg(long, allow_hyphen_values = true)]
        level: i32,
        #[arg(long, value_enum, default_value_t = RoleArg::Standard)]
        role: RoleArg,
    },
}

#[derive(Parser)]
#[command(name = "encounter")]
#[command(about = "Encounter statistics and difficulty")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

fn to_role(r: RoleArg) -> Role {
    match r {
        RoleArg::Minion => Role::Minion,
        RoleArg::Standard => Role::with_flag(RoleType::Soldier, RoleFlag::Standard),
        RoleArg::Elite => Role::with_flag(RoleType::Soldier, RoleFlag::Elite),
        RoleArg::Solo => Role::with_flag(RoleType::Soldier, RoleFlag::Solo),
    }
}

fn print<T: Serialize>(value: &T, yaml: bool) -> Result<()> {
    if yaml {
        print!("{}", serde_yaml::to_string(value)?);
    } else {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Stats {
            library,
            settings,
            creature,
            templates,
            theme,
            theme_attack,
            theme_utility,
            level_adjustment,
            yaml,
        } => {
            let sheet = api::compose(&ComposeConfig {
                library,
                settings,
                creature,
                templates,
                theme,
                theme_attack_power: theme_attack,
                theme_utility_power: theme_utility,
                level_adjustment,
            })?;
            print(&sheet, yaml)?;
        }
        Cmd::Assess {
            library,
            settings,
            encounter,
            party_level,
            party_size,
            yaml,
        } => {
            let assessment = api::assess(&AssessConfig {
                library,
                settings,
                encounter,
                party_level,
                party_size,
            })?;
            print(&assessment, yaml)?;
        }
        Cmd::ThemePowers {
            library,
            theme,
            creature,
            yaml,
        } => {
            let options = api::theme_options(&library, &theme, creature.as_deref())?;
            print(&options, yaml)?;
        }
        Cmd::Xp { level, role } => {
            println!("{}", role_xp(level, &to_role(role), &CampaignSettings::default()));
        }
    }
    Ok(())
}
