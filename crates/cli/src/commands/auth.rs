//! Session commands.

use clap::Subcommand;

use vitrina_storefront::error::Result;
use vitrina_storefront::state::AppState;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Sign in with email and password
    SignIn {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "VITRINA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    SignUp {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "VITRINA_PASSWORD", hide_env_values = true)]
        password: String,

        /// Display name
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Sign out and forget the saved session
    SignOut,
    /// Show the signed-in user
    Whoami,
}

#[allow(clippy::print_stdout)]
pub async fn run(state: &AppState, action: AuthAction) -> Result<()> {
    match action {
        AuthAction::SignIn { email, password } => {
            let identity = state.sign_in(&email, &password).await?;
            println!("Hola, {}", identity.user().display_name());
        }
        AuthAction::SignUp {
            email,
            password,
            name,
        } => {
            let identity = state.sign_up(&email, &password, name.as_deref()).await?;
            println!("Cuenta creada. Hola, {}", identity.user().display_name());
        }
        AuthAction::SignOut => {
            // Favorites are about to be cleared, so only the session is restored
            state.auth().restore().await?;
            state.sign_out().await?;
            println!("Sesión cerrada");
        }
        AuthAction::Whoami => match state.auth().restore().await? {
            Some(identity) => {
                let user = identity.user();
                println!("{} <{}>", user.display_name(), user.email);
            }
            None => println!("No has iniciado sesión"),
        },
    }
    Ok(())
}
