use clap::{Args, Parser, Subcommand};
use user_admin::{
    cli::{
        auth, role,
        db::{db_generate, db_list, db_migrate, db_revert},
    },
    core::db::init_pool,
    settings::get_config,
    validator::user::ProfilePayload,
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database related command
    Db(DbArgs),
    /// Role related command
    Role(RoleArgs),
    /// Authentication related command
    Auth(AuthArgs),
}

#[derive(Debug, Args)]
struct RoleArgs {
    #[command(subcommand)]
    command: RoleCommands,
}

#[derive(Debug, Subcommand)]
enum RoleCommands {
    /// Create new active role
    Create {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        description: Option<String>,
    },
}

#[derive(Debug, Args)]
struct AuthArgs {
    #[command(subcommand)]
    command: AuthCommands,
}

#[derive(Debug, Subcommand)]
enum AuthCommands {
    /// Create new active user with profile
    CreateUser {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        #[arg(short, long)]
        role_id: i32,
        #[arg(long)]
        name: String,
        #[arg(long)]
        lastname: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        address: String,
    },
}

#[derive(Debug, Args)]
struct DbArgs {
    #[command(subcommand)]
    command: DbCommands,
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Generate new migration file
    Generate { migration_name: String },
    /// List all migration
    List,
    /// Run all pending migration
    Migrate,
    /// Revert latest migration
    Revert,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Db(db_args) => match db_args.command {
            DbCommands::Generate { migration_name } => {
                println!("generate migration: {migration_name:?}");
                db_generate(&migration_name).await?;
            }
            DbCommands::List => {
                println!("list migration");
                let config = get_config();
                db_list(&config).await?;
            }
            DbCommands::Migrate => {
                println!("run all pending migration");
                let config = get_config();
                db_migrate(&config).await?;
            }
            DbCommands::Revert => {
                println!("revert latest migration");
                let config = get_config();
                db_revert(&config).await?;
            }
        },
        Commands::Role(role_args) => match role_args.command {
            RoleCommands::Create { name, description } => {
                let config = get_config();
                let pool = init_pool(&config).await?;
                let res = role::create_role(&pool, &name, description).await?;
                println!("created role {:?} with id {}", res.name, res.id);
            }
        },
        Commands::Auth(auth_args) => match auth_args.command {
            AuthCommands::CreateUser {
                email,
                password,
                role_id,
                name,
                lastname,
                phone,
                address,
            } => {
                let config = get_config();
                let pool = init_pool(&config).await?;
                let profile = ProfilePayload {
                    name,
                    lastname,
                    phone,
                    address,
                };
                let res = auth::create_user(&pool, &email, &password, role_id, profile).await?;
                println!("created user {:?} with id {}", res.email, res.id);
            }
        },
    }
    Ok(())
}
