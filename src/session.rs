use crate::constants::{STARTING_POINTS, STARTING_RATING};
use crate::error::{MotoSwapError, Result};
use crate::service::DataService;
use motoswap_core::{Accommodation, Category, Motorcycle, NewUser, User};
use std::fmt;
use tracing::info;

/// Screen the user is looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Home,
    Dashboard,
    Messages,
    Profile,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Home => "home",
            Section::Dashboard => "dashboard",
            Section::Messages => "messages",
            Section::Profile => "profile",
        };
        f.write_str(name)
    }
}

/// Sign-up data as entered by the user
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub age: Option<u32>,
    pub experience: Option<u32>,
    pub brand: String,
    pub model: String,
    pub category: String,
    pub license: String,
    pub displacement: String,
    pub location: String,
}

impl RegistrationForm {
    /// First required field left blank, in form order.
    pub fn missing_field(&self) -> Option<&'static str> {
        let blank = |value: &str| value.trim().is_empty();
        [
            ("name", blank(&self.name)),
            ("email", blank(&self.email)),
            ("age", self.age.is_none()),
            ("experience", self.experience.is_none()),
            ("brand", blank(&self.brand)),
            ("model", blank(&self.model)),
            ("category", blank(&self.category)),
            ("license", blank(&self.license)),
            ("displacement", blank(&self.displacement)),
            ("location", blank(&self.location)),
        ]
        .into_iter()
        .find_map(|(field, missing)| missing.then_some(field))
    }

    fn into_new_user(self) -> NewUser {
        NewUser {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            age: self.age.unwrap_or_default(),
            experience_years: self.experience.unwrap_or_default(),
            location: self.location.trim().to_string(),
            rating: STARTING_RATING,
            points: STARTING_POINTS,
            motorcycle: Motorcycle {
                brand: self.brand.trim().to_string(),
                model: self.model.trim().to_string(),
                category: Category::parse(&self.category),
                displacement: self.displacement.trim().to_string(),
                license: self.license.trim().to_string(),
            },
            accommodation: Some(default_accommodation()),
        }
    }
}

/// What a freshly registered host offers until they edit their profile.
pub fn default_accommodation() -> Accommodation {
    Accommodation {
        kind: "Casa completa".to_string(),
        rooms: 2,
        garage: "Garaje seguro".to_string(),
        facilities: vec![
            "Parking seguro".to_string(),
            "Herramientas básicas".to_string(),
            "WiFi gratuito".to_string(),
        ],
        description: None,
        points_per_night: None,
    }
}

/// Logged-in user and current section.
#[derive(Debug, Clone, Default)]
pub struct Session {
    current_user: Option<User>,
    section: Section,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn require_user(&self) -> Result<&User> {
        self.current_user.as_ref().ok_or(MotoSwapError::NotLoggedIn)
    }

    /// Start a session for `user` on the dashboard.
    pub fn login_as(&mut self, user: User) -> &User {
        info!("Logged in as {} ({})", user.name, user.id);
        self.section = Section::Dashboard;
        self.current_user.insert(user)
    }

    /// Log in as the first user the provider returns.
    pub async fn login_demo(&mut self, service: &DataService) -> Result<&User> {
        let user = service
            .users(1)
            .await
            .into_iter()
            .next()
            .ok_or(MotoSwapError::NoUsers)?;
        Ok(self.login_as(user))
    }

    pub async fn login_with_email(&mut self, service: &DataService, email: &str) -> Result<bool> {
        if email.trim().is_empty() {
            return Err(MotoSwapError::MissingField("email".to_string()));
        }
        match service.user_by_email(email).await {
            Some(user) => {
                self.login_as(user);
                Ok(true)
            }
            None => {
                info!("No user registered with email {}", email.trim());
                Ok(false)
            }
        }
    }

    pub async fn register(&mut self, service: &DataService, form: RegistrationForm) -> Result<&User> {
        if let Some(field) = form.missing_field() {
            return Err(MotoSwapError::MissingField(field.to_string()));
        }
        if service.user_by_email(&form.email).await.is_some() {
            return Err(MotoSwapError::DuplicateEmail(form.email.trim().to_string()));
        }

        let user = service.create_user(form.into_new_user()).await?;
        Ok(self.login_as(user))
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.current_user.take() {
            info!("Logged out {}", user.name);
        }
        self.section = Section::Home;
    }

    pub fn navigate(&mut self, section: Section) {
        self.section = section;
    }
}
