use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use schoolhub::cli::create_super_admin;
use schoolhub::cli::seeder::{SEED_PASSWORD, SeedConfig, seed_database};
use schoolhub_config::DatabaseConfig;
use schoolhub_db::{PgStore, init_db_pool, run_migrations};

#[derive(Parser)]
#[command(name = "schoolhub-cli")]
#[command(about = "SchoolHub CLI - Administrative tools for SchoolHub", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new super administrator account
    CreateSuperadmin {
        /// First name of the super admin
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        /// Last name of the super admin
        #[arg(short = 'l', long)]
        last_name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Apply pending database migrations
    Migrate,
    /// Seed the database with fake schools, staff, classes and students
    Seed {
        /// Number of schools to create
        #[arg(short = 's', long, default_value = "2")]
        schools: usize,

        /// Number of teachers per school
        #[arg(long, default_value = "4")]
        teachers: usize,

        /// Number of classes per school
        #[arg(long, default_value = "3")]
        classes: usize,

        /// Number of students per class
        #[arg(long, default_value = "10")]
        students: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let database_config =
        DatabaseConfig::from_env().map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let pool = init_db_pool(&database_config)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::CreateSuperadmin {
            first_name,
            last_name,
            email,
            password,
        } => {
            let store = PgStore::new(pool);
            handle_create_superadmin(&store, first_name, last_name, email, password).await
        }
        Commands::Migrate => {
            run_migrations(&pool).await?;
            println!("✅ Migrations applied");
            Ok(())
        }
        Commands::Seed {
            schools,
            teachers,
            classes,
            students,
        } => {
            let store = PgStore::new(pool);
            let config = SeedConfig {
                schools,
                teachers_per_school: teachers,
                classes_per_school: classes,
                students_per_class: students,
            };
            let summary = seed_database(&store, config).await?;
            println!("\n✅ Seeding complete!");
            println!(
                "   Schools: {}, Teachers: {}, Classes: {}, Students: {}",
                summary.schools, summary.teachers, summary.classes, summary.students
            );
            println!("   Seeded accounts use the password: {}", SEED_PASSWORD);
            Ok(())
        }
    }
}

async fn handle_create_superadmin(
    store: &PgStore,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let first_name = match first_name {
        Some(value) => value,
        None => Input::new().with_prompt("First name").interact_text()?,
    };

    let last_name = match last_name {
        Some(value) => value,
        None => Input::new().with_prompt("Last name").interact_text()?,
    };

    let email = match email {
        Some(value) => value,
        None => Input::new().with_prompt("Email address").interact_text()?,
    };

    let password = match password {
        Some(value) => value,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()?,
    };

    let user = create_super_admin(store, &first_name, &last_name, &email, &password).await?;
    println!("\n✅ Super admin created successfully!");
    println!("   Email: {}", user.email);
    println!("   Name: {} {}", user.first_name, user.last_name);
    Ok(())
}
