use anyhow::Context;
use clap::{Parser, Subcommand};
use motoswap::constants::DEFAULT_CONFIG_PATH;
use motoswap::helpers::{random_points, rating_stars};
use motoswap::{
    build_provider, logging, metrics, ChatService, Config, DataService, Direction, MotoSwapError,
    RegistrationForm, Session,
};
use motoswap_core::{facility_icon, facility_icons, Category, FilterCriteria, Listing};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "motoswap")]
#[command(about = "Motorcycle-friendly accommodation exchange")]
#[command(version = "0.1.0")]
struct Cli {
    /// Data source to use (fixture or supabase); overrides config and environment
    #[arg(long, global = true)]
    source: Option<String>,

    /// Path to the TOML configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search listings
    Listings {
        /// Motorcycle category the rider brings (e.g. Cruiser, Adventure/Trail)
        #[arg(long)]
        category: Option<String>,
        /// Case-insensitive location substring
        #[arg(long)]
        location: Option<String>,
        /// Facility group: garage, tools, camera, wash (or any keyword)
        #[arg(long)]
        facility: Option<String>,
        /// Accommodation kind substring (e.g. Apartamento, Casa)
        #[arg(long)]
        kind: Option<String>,
        /// Highest points per night the rider will pay
        #[arg(long)]
        max_points: Option<i64>,
        /// Leave out the listing hosted by this user id
        #[arg(long)]
        exclude_owner: Option<i64>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show host categories compatible with a rider's category
    Compatible { category: String },
    /// Print the facility icon table
    Facilities,
    /// Log in by email, or as the demo user when no email is given
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Register a new host
    Register {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        age: Option<u32>,
        #[arg(long)]
        experience: Option<u32>,
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        license: Option<String>,
        #[arg(long)]
        displacement: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
    /// Send a chat message
    Chat {
        #[arg(long)]
        from: i64,
        #[arg(long)]
        to: i64,
        text: String,
        /// Wait for a simulated reply from the recipient
        #[arg(long)]
        auto_reply: bool,
    },
    /// Show the conversation between two users
    Conversation {
        #[arg(long)]
        user: i64,
        #[arg(long)]
        with: i64,
    },
    /// Community statistics
    Stats,
    /// Check that the data provider is reachable
    Ping,
}

fn print_listing(listing: &Listing) {
    let points = if listing.points > 0 {
        listing.points
    } else {
        random_points()
    };
    println!(
        "🏍️  #{} {} · {} · {}",
        listing.id, listing.owner_name, listing.location, listing.category
    );
    println!(
        "    🏠 {} ({} hab.) · 🅿️  {} · {} pts/noche · {} {}",
        listing.accommodation_kind,
        listing.rooms,
        listing.garage,
        points,
        rating_stars(listing.rating),
        listing.rating
    );
    for facility in &listing.facilities {
        println!("      {} {}", facility_icon(facility), facility);
    }
}

async fn login_session(service: &DataService, user_id: i64) -> anyhow::Result<Session> {
    let user = service
        .user(user_id)
        .await
        .ok_or(MotoSwapError::UserNotFound(user_id))?;
    let mut session = Session::new();
    session.login_as(user);
    Ok(session)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();

    let mut config = Config::load_from(&cli.config).context("Failed to load configuration")?;
    if let Some(source) = &cli.source {
        config.data.source = source.parse()?;
    }
    if let Some(addr) = &config.metrics.addr {
        metrics::init_metrics(addr);
    }

    let provider = build_provider(&config)?;
    let service = DataService::from_config(provider, &config);
    info!("MotoSwap started with {} data source", config.data.source);

    match cli.command {
        Commands::Listings {
            category,
            location,
            facility,
            kind,
            max_points,
            exclude_owner,
            limit,
        } => {
            let mut criteria = FilterCriteria::from_form(
                category.as_deref().unwrap_or_default(),
                location.as_deref().unwrap_or_default(),
                facility.as_deref().unwrap_or_default(),
            );
            if let Some(kind) = kind {
                criteria = criteria.with_accommodation_kind(kind);
            }
            if let Some(max) = max_points {
                criteria = criteria.with_max_points(max);
            }
            if let Some(owner) = exclude_owner {
                criteria = criteria.excluding_owner(owner);
            }
            let mut listings = service.search_listings(&criteria).await;
            if let Some(limit) = limit {
                listings.truncate(limit);
            }

            println!("🔎 {} listings found\n", listings.len());
            for listing in &listings {
                print_listing(listing);
                println!();
            }
        }
        Commands::Compatible { category } => {
            let category = Category::parse(&category);
            let compatible = service.compatible_categories(&category).await;
            let labels: Vec<&str> = compatible.iter().map(Category::label).collect();
            println!("🏍️  A {} rider can stay with: {}", category, labels.join(", "));

            let listings = service.compatible_listings(&category).await;
            println!("📋 {} matching listings", listings.len());
            for listing in &listings {
                println!("   - #{} {} ({}, {})", listing.id, listing.owner_name, listing.location, listing.category);
            }
        }
        Commands::Facilities => {
            for (name, icon) in facility_icons() {
                println!("{}  {}", icon, name);
            }
        }
        Commands::Login { email } => {
            let mut session = Session::new();
            let found = match email.as_deref() {
                Some(email) => session.login_with_email(&service, email).await?,
                None => {
                    session.login_demo(&service).await?;
                    true
                }
            };

            match session.current_user() {
                Some(user) if found => {
                    println!("✅ Logged in as {} ({})", user.name, user.email);
                    println!("   🏍️  {} {} ({})", user.motorcycle.brand, user.motorcycle.model, user.motorcycle.category);
                    println!("   ⭐ {} · {} points · section: {}", user.rating, user.points, session.section());
                }
                _ => println!("❌ No account found for that email"),
            }
        }
        Commands::Register {
            name,
            email,
            age,
            experience,
            brand,
            model,
            category,
            license,
            displacement,
            location,
        } => {
            let form = RegistrationForm {
                name: name.unwrap_or_default(),
                email: email.unwrap_or_default(),
                age,
                experience,
                brand: brand.unwrap_or_default(),
                model: model.unwrap_or_default(),
                category: category.unwrap_or_default(),
                license: license.unwrap_or_default(),
                displacement: displacement.unwrap_or_default(),
                location: location.unwrap_or_default(),
            };

            let mut session = Session::new();
            match session.register(&service, form).await {
                Ok(user) => {
                    println!("🎉 Welcome {}! Your account id is {}", user.name, user.id);
                    println!("   You start with {} points", user.points);
                }
                Err(e @ (MotoSwapError::MissingField(_) | MotoSwapError::DuplicateEmail(_))) => {
                    warn!("Registration rejected: {}", e);
                    println!("❌ {}", e);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Commands::Chat {
            from,
            to,
            text,
            auto_reply,
        } => {
            let session = login_session(&service, from).await?;
            let chat = ChatService::new(&service, config.auto_reply_delay());

            if auto_reply {
                match chat.send_with_auto_reply(&session, to, &text).await? {
                    Some((sent, reply)) => {
                        println!("📤 {}", sent.content);
                        match reply {
                            Some(reply) => println!("📥 {}", reply.content),
                            None => println!("⚠️  No reply stored"),
                        }
                    }
                    None => println!("⚠️  Empty message, nothing sent"),
                }
            } else {
                match chat.send(&session, to, &text).await? {
                    Some(sent) => println!("📤 {}", sent.content),
                    None => println!("⚠️  Empty message, nothing sent"),
                }
            }
        }
        Commands::Conversation { user, with } => {
            let session = login_session(&service, user).await?;
            let chat = ChatService::new(&service, config.auto_reply_delay());
            let lines = chat.conversation(&session, with).await?;

            if lines.is_empty() {
                println!("💬 No messages yet");
            }
            for line in lines {
                let arrow = match line.direction {
                    Direction::Sent => "📤",
                    Direction::Received => "📥",
                };
                println!(
                    "{} [{}] {}",
                    arrow,
                    line.message.sent_at.format("%H:%M"),
                    line.message.content
                );
            }
        }
        Commands::Stats => {
            let stats = service.stats().await;
            println!("📊 MotoSwap statistics ({} source)", service.provider_name());
            println!("   Users: {}", stats.total_users);
            println!("   Listings: {}", stats.total_listings);
            println!("   Messages: {}", stats.total_messages);
            match stats.average_rating {
                Some(rating) => println!("   Average rating: {:.2}", rating),
                None => println!("   Average rating: n/a"),
            }
        }
        Commands::Ping => {
            if service.test_connection().await {
                println!("✅ {} provider is reachable", service.provider_name());
            } else {
                println!("❌ {} provider is not reachable", service.provider_name());
            }
        }
    }

    Ok(())
}
