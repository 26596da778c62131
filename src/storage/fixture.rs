use super::traits::DataProvider;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use motoswap_core::{
    Accommodation, Category, Listing, Message, MessageKind, Motorcycle, NewMessage, NewUser, User,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;
use uuid::Uuid;

/// Static mock data with in-memory writes, for demos and tests.
pub struct FixtureProvider {
    users: Arc<Mutex<Vec<User>>>,
    messages: Arc<Mutex<Vec<Message>>>,
}

impl Default for FixtureProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl FixtureProvider {
    /// The ten demo hosts plus a short sample conversation.
    pub fn new() -> Self {
        Self::with_data(demo_users(), sample_messages())
    }

    pub fn with_data(users: Vec<User>, messages: Vec<Message>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
            messages: Arc::new(Mutex::new(messages)),
        }
    }

    fn users(&self) -> MutexGuard<'_, Vec<User>> {
        self.users.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn messages(&self) -> MutexGuard<'_, Vec<Message>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl DataProvider for FixtureProvider {
    fn name(&self) -> &'static str {
        "fixture"
    }

    async fn list_users(&self, limit: Option<usize>) -> Result<Vec<User>> {
        Ok(self
            .users()
            .iter()
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        Ok(self.users().iter().find(|u| u.id == id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.trim().to_lowercase();
        Ok(self
            .users()
            .iter()
            .find(|u| u.email.to_lowercase() == email)
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut users = self.users();
        let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let user = user.into_user(id);
        users.push(user.clone());

        debug!("Created user: {} with id {}", user.name, id);
        Ok(user)
    }

    async fn count_users(&self) -> Result<usize> {
        Ok(self.users().len())
    }

    async fn list_listings(&self, limit: Option<usize>) -> Result<Vec<Listing>> {
        Ok(self
            .users()
            .iter()
            .filter_map(User::listing)
            .take(limit.unwrap_or(usize::MAX))
            .collect())
    }

    async fn count_listings(&self) -> Result<usize> {
        Ok(self.users().iter().filter(|u| u.accommodation.is_some()).count())
    }

    async fn get_messages(&self, user_a: i64, user_b: i64, limit: usize) -> Result<Vec<Message>> {
        let mut conversation: Vec<Message> = self
            .messages()
            .iter()
            .filter(|m| m.involves(user_a, user_b))
            .cloned()
            .collect();
        conversation.sort_by_key(|m| m.sent_at);
        conversation.truncate(limit);
        Ok(conversation)
    }

    async fn send_message(&self, message: NewMessage) -> Result<Message> {
        let message = Message {
            id: Uuid::new_v4(),
            sender_id: message.sender_id,
            recipient_id: message.recipient_id,
            content: message.content,
            kind: message.kind,
            sent_at: Utc::now(),
        };
        self.messages().push(message.clone());

        debug!(
            "Stored message {} from {} to {}",
            message.id, message.sender_id, message.recipient_id
        );
        Ok(message)
    }

    async fn count_messages(&self) -> Result<usize> {
        Ok(self.messages().len())
    }

    async fn test_connection(&self) -> Result<bool> {
        Ok(true)
    }
}

#[allow(clippy::too_many_arguments)]
fn demo_user(
    id: i64,
    name: &str,
    email: &str,
    age: u32,
    experience_years: u32,
    motorcycle: (&str, &str, &str, &str, &str),
    location: &str,
    accommodation: (&str, u32, &str, &[&str]),
    points: i64,
    rating: f64,
) -> User {
    let (brand, model, category, displacement, license) = motorcycle;
    let (kind, rooms, garage, facilities) = accommodation;
    User {
        id,
        name: name.to_string(),
        email: email.to_string(),
        age,
        experience_years,
        location: location.to_string(),
        rating,
        points,
        total_exchanges: 0,
        motorcycle: Motorcycle {
            brand: brand.to_string(),
            model: model.to_string(),
            category: Category::parse(category),
            displacement: displacement.to_string(),
            license: license.to_string(),
        },
        accommodation: Some(Accommodation {
            kind: kind.to_string(),
            rooms,
            garage: garage.to_string(),
            facilities: facilities.iter().map(|f| f.to_string()).collect(),
            description: None,
            points_per_night: None,
        }),
    }
}

pub fn demo_users() -> Vec<User> {
    vec![
        demo_user(
            1, "Carlos Rodríguez", "carlos.rodriguez@motoswap.es", 35, 10,
            ("BMW", "R1250GS Adventure", "Adventure/Trail", "1254cc", "A"),
            "Madrid, España",
            ("Casa completa", 3, "Cubierto para 2 motos",
             &["Anclajes suelo", "Herramientas básicas", "Cámaras seguridad", "Zona lavado motos"]),
            150, 4.8,
        ),
        demo_user(
            2, "Ana Martínez", "ana.martinez@motoswap.es", 28, 5,
            ("Ducati", "Panigale V4", "Deportiva", "1103cc", "A"),
            "Barcelona, España",
            ("Apartamento", 2, "Subterráneo seguro",
             &["Acceso fácil", "Herramientas mantenimiento", "Conexión eléctrica"]),
            220, 4.9,
        ),
        demo_user(
            3, "Javier López", "javier.lopez@motoswap.es", 42, 20,
            ("Harley-Davidson", "Road King", "Cruiser", "1746cc", "A"),
            "Valencia, España",
            ("Villa con piscina", 4, "Amplio garaje cerrado",
             &["Elevador moto", "Kit limpieza", "Zona BBQ", "Parking múltiple"]),
            320, 5.0,
        ),
        demo_user(
            4, "María González", "maria.gonzalez@motoswap.es", 31, 8,
            ("Honda", "Africa Twin", "Adventure/Trail", "1084cc", "A"),
            "Sevilla, España",
            ("Casa rural", 3, "Cobertizo grande",
             &["Taller equipado", "Zona lavado presión", "Aceites disponibles"]),
            180, 4.7,
        ),
        demo_user(
            5, "Pedro Sánchez", "pedro.sanchez@motoswap.es", 38, 15,
            ("Yamaha", "MT-09", "Naked", "889cc", "A"),
            "Bilbao, España",
            ("Piso céntrico", 2, "Plaza de garaje privada",
             &["Vigilancia 24h", "Ascensor directo", "Cerca de tiendas moto"]),
            200, 4.6,
        ),
        demo_user(
            6, "Laura Fernández", "laura.fernandez@motoswap.es", 29, 6,
            ("KTM", "390 Duke", "Naked", "373cc", "A2"),
            "Zaragoza, España",
            ("Apartamento moderno", 1, "Parking comunitario seguro",
             &["Cadenas seguridad", "WiFi fibra", "Terraza"]),
            140, 4.5,
        ),
        demo_user(
            7, "Roberto Ruiz", "roberto.ruiz@motoswap.es", 45, 25,
            ("BMW", "K1600GT", "Touring", "1649cc", "A"),
            "Málaga, España",
            ("Chalet playa", 5, "Doble garaje cerrado",
             &["Taller completo", "Elevador hidráulico", "Repuestos básicos", "Ducha exterior"]),
            380, 4.9,
        ),
        demo_user(
            8, "Sandra Moreno", "sandra.moreno@motoswap.es", 33, 12,
            ("Triumph", "Street Triple RS", "Naked", "765cc", "A"),
            "Granada, España",
            ("Casa Albaicín", 2, "Patio interior cubierto",
             &["Cargador eléctrico", "Kit herramientas", "Guías rutas locales"]),
            160, 4.8,
        ),
        demo_user(
            9, "Miguel Ángel Torres", "miguel.torres@motoswap.es", 36, 14,
            ("Suzuki", "GSX-R1000", "Deportiva", "999cc", "A"),
            "Santander, España",
            ("Dúplex con vistas", 3, "Garaje individual cerrado",
             &["Anclajes pared", "Compresor aire", "Zona almacenamiento equipación"]),
            240, 4.7,
        ),
        demo_user(
            10, "Isabel Díaz", "isabel.diaz@motoswap.es", 27, 4,
            ("Honda", "PCX 125", "Scooter", "125cc", "A1"),
            "Murcia, España",
            ("Estudio céntrico", 1, "Parking subterráneo",
             &["Trastero para equipación", "Cerca metro", "Supermercado 24h"]),
            100, 4.4,
        ),
    ]
}

/// Opening exchange between Ana (2) and Carlos (1).
pub fn sample_messages() -> Vec<Message> {
    let start = Utc::now() - Duration::minutes(30);
    let message = |sender_id, recipient_id, content: &str, offset_minutes| Message {
        id: Uuid::new_v4(),
        sender_id,
        recipient_id,
        content: content.to_string(),
        kind: MessageKind::Message,
        sent_at: start + Duration::minutes(offset_minutes),
    };

    vec![
        message(2, 1, "¡Hola Carlos! Vi tu casa en Madrid y me encantaría hacer un intercambio.", 0),
        message(2, 1, "Tengo una Ducati Panigale, ¿tu garaje tiene espacio suficiente?", 2),
        message(1, 2, "¡Hola Ana! Sí, perfecto. Mi garaje es cubierto y tiene anclajes para deportivas.", 15),
    ]
}
