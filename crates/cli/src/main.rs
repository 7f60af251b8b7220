//! CloudMart CLI - storefront client for the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! cloudmart products --search lamp
//!
//! # Manage the cart
//! cloudmart cart add 4
//! cloudmart cart set 4 3
//! cloudmart cart list
//!
//! # Set the profile email and place the order
//! cloudmart user update --email shopper@example.com
//! cloudmart checkout
//! ```
//!
//! # Commands
//!
//! - `products` - List the catalog
//! - `cart` - Inspect and edit the local cart
//! - `user` - Show or edit the local profile
//! - `checkout` - Submit the cart as an order
//! - `orders` - List orders placed with the profile email
//! - `support` - Chat with the support agent
//! - `assistant` - Ask the shopping assistant
//! - `admin` - Manage products, orders, and support tickets on the backend
//!
//! # Environment Variables
//!
//! - `CLOUDMART_API_BASE_URL`, `CLOUDMART_API_TIMEOUT_SECS`,
//!   `CLOUDMART_STORAGE_PATH` - see `cloudmart_storefront::config`
//! - `RUST_LOG` - log filter (default: `cloudmart=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};
use cloudmart_core::{OrderId, OrderStatus, Price, ProductId, TicketId, TicketStatus};
use cloudmart_storefront::config::StorefrontConfig;
use cloudmart_storefront::state::Storefront;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "cloudmart")]
#[command(author, version, about = "CloudMart storefront client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products {
        /// Only show products whose name contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the local user profile
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Place an order for everything in the cart
    Checkout,
    /// List orders placed with the profile email
    Orders,
    /// Chat with customer support
    Support {
        #[command(subcommand)]
        action: SupportAction,
    },
    /// Ask the shopping assistant a question
    Assistant {
        /// Question for the assistant
        message: String,
    },
    /// Back-office management through the backend API
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and subtotal
    List,
    /// Add one unit of a product
    Add {
        /// Product ID
        id: ProductId,
    },
    /// Remove a product line
    Remove {
        /// Product ID
        id: ProductId,
    },
    /// Set the quantity of a product line
    Set {
        /// Product ID
        id: ProductId,
        /// New quantity (at least 1)
        quantity: u32,
    },
    /// Empty the cart
    Clear,
    /// Show the number of units in the cart
    Count,
}

#[derive(Subcommand)]
enum UserAction {
    /// Show the profile
    Show,
    /// Create the anonymous profile if none exists
    Init,
    /// Change profile fields
    Update {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
}

#[derive(Subcommand)]
enum SupportAction {
    /// List support threads
    List,
    /// Start a new support thread
    New,
    /// Send a message on the active thread
    Send {
        /// Message text
        message: String,
    },
    /// End the active thread and request sentiment analysis
    End,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create, update, or delete catalog products
    Products {
        #[command(subcommand)]
        action: AdminProductAction,
    },
    /// List orders, change their status, or delete them
    Orders {
        #[command(subcommand)]
        action: AdminOrderAction,
    },
    /// List or delete support tickets
    Tickets {
        #[command(subcommand)]
        action: AdminTicketAction,
    },
}

#[derive(Subcommand)]
enum AdminProductAction {
    /// Add a product to the catalog
    Create {
        #[arg(long)]
        name: String,
        /// Unit price, e.g. `24.50`
        #[arg(long)]
        price: Price,
        #[arg(long)]
        description: Option<String>,
        /// Image URL
        #[arg(long)]
        image: Option<String>,
    },
    /// Change product fields; unset fields keep their value
    Update {
        /// Product ID
        id: ProductId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        price: Option<Price>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        image: Option<String>,
    },
    /// Remove a product from the catalog
    Delete {
        /// Product ID
        id: ProductId,
    },
}

#[derive(Subcommand)]
enum AdminOrderAction {
    /// List every order, newest first
    List,
    /// Set an order's status (`Pending`, `Processing`, `Shipped`, `Delivered`, `Cancelled`)
    Status {
        /// Order ID
        id: OrderId,
        status: OrderStatus,
    },
    /// Delete an order
    Delete {
        /// Order ID
        id: OrderId,
    },
}

#[derive(Subcommand)]
enum AdminTicketAction {
    /// List tickets
    List {
        /// Only show tickets with this status (`open`, `in_progress`, `closed`)
        #[arg(short, long)]
        status: Option<TicketStatus>,
    },
    /// Delete a ticket
    Delete {
        /// Ticket ID
        id: TicketId,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cloudmart=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let storefront = Storefront::new(StorefrontConfig::from_env()?)?;
    storefront.user().initialize()?;

    match cli.command {
        Commands::Products { search } => {
            commands::products::list(&storefront, search.as_deref()).await?;
        }
        Commands::Cart { action } => match action {
            CartAction::List => commands::cart::list(&storefront)?,
            CartAction::Add { id } => commands::cart::add(&storefront, &id).await?,
            CartAction::Remove { id } => commands::cart::remove(&storefront, &id)?,
            CartAction::Set { id, quantity } => {
                commands::cart::set_quantity(&storefront, &id, quantity)?;
            }
            CartAction::Clear => commands::cart::clear(&storefront)?,
            CartAction::Count => commands::cart::count(&storefront)?,
        },
        Commands::User { action } => match action {
            UserAction::Show | UserAction::Init => commands::user::show(&storefront)?,
            UserAction::Update {
                email,
                first_name,
                last_name,
                phone,
            } => {
                let changes = commands::user::ProfileChanges {
                    email,
                    first_name,
                    last_name,
                    phone,
                };
                commands::user::update(&storefront, changes)?;
            }
        },
        Commands::Checkout => commands::orders::checkout(&storefront).await?,
        Commands::Orders => commands::orders::list(&storefront).await?,
        Commands::Support { action } => match action {
            SupportAction::List => commands::support::list(&storefront)?,
            SupportAction::New => commands::support::new_thread(&storefront).await?,
            SupportAction::Send { message } => {
                commands::support::send(&storefront, &message).await?;
            }
            SupportAction::End => commands::support::end(&storefront).await?,
        },
        Commands::Assistant { message } => {
            commands::support::ask_assistant(&storefront, &message).await?;
        }
        Commands::Admin { action } => run_admin(&storefront, action).await?,
    }
    Ok(())
}

async fn run_admin(storefront: &Storefront, action: AdminAction) -> commands::Result {
    use commands::admin::{self, ProductFields};

    match action {
        AdminAction::Products { action } => match action {
            AdminProductAction::Create {
                name,
                price,
                description,
                image,
            } => {
                let fields = ProductFields {
                    description,
                    image,
                    ..ProductFields::default()
                };
                admin::create_product(storefront, name, price, fields).await?;
            }
            AdminProductAction::Update {
                id,
                name,
                price,
                description,
                image,
            } => {
                let fields = ProductFields {
                    name,
                    description,
                    price,
                    image,
                };
                admin::update_product(storefront, &id, fields).await?;
            }
            AdminProductAction::Delete { id } => admin::delete_product(storefront, &id).await?,
        },
        AdminAction::Orders { action } => match action {
            AdminOrderAction::List => admin::list_orders(storefront).await?,
            AdminOrderAction::Status { id, status } => {
                admin::set_order_status(storefront, &id, status).await?;
            }
            AdminOrderAction::Delete { id } => admin::delete_order(storefront, &id).await?,
        },
        AdminAction::Tickets { action } => match action {
            AdminTicketAction::List { status } => admin::list_tickets(storefront, status).await?,
            AdminTicketAction::Delete { id } => admin::delete_ticket(storefront, &id).await?,
        },
    }
    Ok(())
}
