use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use lousa::cli::create_superuser;
use lousa_db::init_db_pool;

#[derive(Parser)]
#[command(name = "lousa-cli")]
#[command(about = "Lousa CLI - Administrative tools for the Lousa accounts API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a superuser account
    CreateSuperuser {
        /// Display name
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Phone number with area code
        #[arg(long)]
        phone: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
}

fn prompt(label: &str) -> String {
    Input::new()
        .with_prompt(label)
        .interact_text()
        .unwrap_or_else(|e| {
            eprintln!("Failed to read {}: {}", label.to_lowercase(), e);
            std::process::exit(1);
        })
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::CreateSuperuser {
            name,
            email,
            phone,
            password,
        } => {
            let name = name.unwrap_or_else(|| prompt("Name"));
            let email = email.unwrap_or_else(|| prompt("Email address"));
            let phone = phone.unwrap_or_else(|| prompt("Phone"));
            let password = password.unwrap_or_else(|| {
                Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Confirm password", "Passwords don't match")
                    .interact()
                    .unwrap_or_else(|e| {
                        eprintln!("Failed to read password: {}", e);
                        std::process::exit(1);
                    })
            });

            let pool = init_db_pool().await;

            match create_superuser(&pool, &name, &email, &phone, &password).await {
                Ok(user) => {
                    println!("\n✅ Superuser created successfully!");
                    println!("   Email: {}", user.email);
                    println!("   Name: {}", user.name);
                }
                Err(e) => {
                    eprintln!("\n❌ Error creating superuser: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}
