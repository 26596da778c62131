use super::traits::DataProvider;
use crate::config::Config;
use crate::error::{MotoSwapError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use motoswap_core::{
    resolve_compatible, Category, Listing, Message, MessageKind, Motorcycle,
    NewMessage, NewUser, User,
};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_RANGE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

const USER_SELECT: &str = "*,motorcycles(marca,modelo,tipo,cilindrada,licencia)";
const LISTING_SELECT: &str = "*,users(nombre,puntos,valoracion_promedio,motorcycles(tipo)),accommodation_facilities(nombre)";

const KIND_MESSAGE: &str = "mensaje";
const KIND_AUTO_REPLY: &str = "respuesta_auto";

/// Backend-as-a-service client talking to Supabase's PostgREST endpoint.
///
/// Config:
/// - SUPABASE_URL (e.g., https://xyzcompany.supabase.co)
/// - SUPABASE_ANON_KEY (public anon key, sent as `apikey` and bearer token)
pub struct SupabaseProvider {
    client: reqwest::Client,
    base_url: String,
}

impl SupabaseProvider {
    pub fn new(url: &str, anon_key: &str, timeout: Duration) -> Result<Self> {
        let header = |value: String| {
            HeaderValue::from_str(&value)
                .map_err(|e| MotoSwapError::Config(format!("Invalid Supabase key: {}", e)))
        };
        let mut headers = HeaderMap::new();
        headers.insert("apikey", header(anon_key.to_string())?);
        headers.insert(AUTHORIZATION, header(format!("Bearer {}", anon_key))?);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let (url, key) = config.supabase_credentials()?;
        Self::new(&url, &key, Duration::from_secs(config.supabase.timeout_seconds))
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        debug!("GET {} {:?}", table, query);
        let resp = self.client.get(self.table_url(table)).query(query).send().await?;
        let resp = check_status(table, resp).await?;
        Ok(resp.json().await?)
    }

    async fn insert<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        table: &str,
        body: &B,
    ) -> Result<Vec<T>> {
        debug!("POST {}", table);
        let resp = self
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        let resp = check_status(table, resp).await?;
        Ok(resp.json().await?)
    }

    /// Exact row count for `table` under `filters`, read from `Content-Range`.
    async fn count(&self, table: &str, filters: &[(&str, String)]) -> Result<usize> {
        let resp = self
            .client
            .get(self.table_url(table))
            .query(&[("select", "id"), ("limit", "1")])
            .query(filters)
            .header("Prefer", "count=exact")
            .send()
            .await?;
        let resp = check_status(table, resp).await?;
        resp.headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total)
            .ok_or_else(|| MotoSwapError::Api {
                message: format!("Supabase response for '{}' is missing a Content-Range total", table),
            })
    }
}

async fn check_status(table: &str, resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(MotoSwapError::Api {
        message: format!("Supabase request on '{}' failed: {} - {}", table, status, body),
    })
}

/// Total from a PostgREST `Content-Range` header such as `0-0/42` or `*/0`.
pub(crate) fn parse_content_range_total(value: &str) -> Option<usize> {
    value.rsplit_once('/')?.1.trim().parse().ok()
}

#[derive(Debug, Deserialize)]
struct MotorcycleRow {
    marca: Option<String>,
    modelo: Option<String>,
    tipo: Option<String>,
    cilindrada: Option<String>,
    licencia: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserRow {
    id: i64,
    nombre: String,
    email: Option<String>,
    edad: Option<u32>,
    experiencia_anos: Option<u32>,
    ubicacion: Option<String>,
    valoracion_promedio: Option<f64>,
    puntos: Option<i64>,
    total_intercambios: Option<u32>,
    #[serde(default)]
    motorcycles: Vec<MotorcycleRow>,
}

#[derive(Debug, Deserialize)]
struct OwnerRow {
    nombre: String,
    puntos: Option<i64>,
    valoracion_promedio: Option<f64>,
    #[serde(default)]
    motorcycles: Vec<MotorcycleRow>,
}

#[derive(Debug, Deserialize)]
struct FacilityRow {
    nombre: String,
}

#[derive(Debug, Deserialize)]
struct AccommodationRow {
    id: i64,
    user_id: Option<i64>,
    tipo: Option<String>,
    ciudad: Option<String>,
    pais: Option<String>,
    habitaciones: Option<u32>,
    garaje_tipo: Option<String>,
    puntos_por_noche: Option<i64>,
    users: Option<OwnerRow>,
    #[serde(default)]
    accommodation_facilities: Vec<FacilityRow>,
}

#[derive(Debug, Deserialize)]
struct CompatibilityRow {
    tipo_compatible: String,
}

#[derive(Debug, Deserialize)]
struct MessageRow {
    id: Option<Uuid>,
    remitente_id: i64,
    destinatario_id: i64,
    contenido: String,
    tipo: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct IdRow {
    id: i64,
}

const NOT_SPECIFIED: &str = "Sin especificar";

fn motorcycle_from_rows(rows: Vec<MotorcycleRow>) -> Motorcycle {
    let row = rows.into_iter().next();
    let field = |f: Option<String>, fallback: &str| f.unwrap_or_else(|| fallback.to_string());
    match row {
        Some(row) => Motorcycle {
            brand: field(row.marca, NOT_SPECIFIED),
            model: field(row.modelo, NOT_SPECIFIED),
            category: row.tipo.map(Category::from).unwrap_or_default(),
            displacement: field(row.cilindrada, "N/A"),
            license: field(row.licencia, "N/A"),
        },
        None => Motorcycle {
            brand: NOT_SPECIFIED.to_string(),
            model: NOT_SPECIFIED.to_string(),
            category: Category::default(),
            displacement: "N/A".to_string(),
            license: "N/A".to_string(),
        },
    }
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.nombre,
            email: row.email.unwrap_or_default(),
            age: row.edad.unwrap_or_default(),
            experience_years: row.experiencia_anos.unwrap_or_default(),
            location: row.ubicacion.unwrap_or_default(),
            rating: row.valoracion_promedio.unwrap_or_default(),
            points: row.puntos.unwrap_or_default(),
            total_exchanges: row.total_intercambios.unwrap_or_default(),
            motorcycle: motorcycle_from_rows(row.motorcycles),
            // The users endpoint carries no accommodation detail
            accommodation: None,
        }
    }
}

impl From<AccommodationRow> for Listing {
    fn from(row: AccommodationRow) -> Self {
        let location = match (row.ciudad, row.pais) {
            (Some(city), Some(country)) => format!("{}, {}", city, country),
            (Some(city), None) => city,
            (None, Some(country)) => country,
            (None, None) => String::new(),
        };
        let (owner_name, points, rating, category) = match row.users {
            Some(owner) => (
                owner.nombre,
                owner.puntos.unwrap_or_default(),
                owner.valoracion_promedio.unwrap_or_default(),
                motorcycle_from_rows(owner.motorcycles).category,
            ),
            None => (String::new(), 0, 0.0, Category::default()),
        };

        Listing {
            id: row.id,
            owner_id: row.user_id.unwrap_or_default(),
            owner_name,
            location,
            category,
            facilities: row
                .accommodation_facilities
                .into_iter()
                .map(|f| f.nombre)
                .collect(),
            accommodation_kind: row.tipo.unwrap_or_default(),
            rooms: row.habitaciones.unwrap_or_default(),
            garage: row.garaje_tipo.unwrap_or_default(),
            points: row.puntos_por_noche.unwrap_or(points),
            rating,
        }
    }
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Message {
            id: row.id.unwrap_or_else(Uuid::new_v4),
            sender_id: row.remitente_id,
            recipient_id: row.destinatario_id,
            content: row.contenido,
            kind: match row.tipo.as_deref() {
                Some(KIND_AUTO_REPLY) => MessageKind::AutoReply,
                _ => MessageKind::Message,
            },
            sent_at: row.created_at.unwrap_or_else(Utc::now),
        }
    }
}

fn kind_label(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Message => KIND_MESSAGE,
        MessageKind::AutoReply => KIND_AUTO_REPLY,
    }
}

/// Label stored in the backend's `tipo` columns, which use the Spanish
/// "Deportiva" for sport bikes.
pub(crate) fn backend_category(category: &Category) -> &str {
    match category {
        Category::Sport => "Deportiva",
        other => other.label(),
    }
}

/// Escape `ilike` wildcards so the value matches literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn active_user_filter() -> (&'static str, String) {
    ("estado", "eq.activo".to_string())
}

fn available_listing_filter() -> (&'static str, String) {
    ("disponible", "eq.true".to_string())
}

fn with_limit(mut query: Vec<(&'static str, String)>, limit: Option<usize>) -> Vec<(&'static str, String)> {
    if let Some(limit) = limit {
        query.push(("limit", limit.to_string()));
    }
    query
}

fn users_query(limit: Option<usize>) -> Vec<(&'static str, String)> {
    with_limit(
        vec![
            ("select", USER_SELECT.to_string()),
            active_user_filter(),
            ("order", "nombre".to_string()),
        ],
        limit,
    )
}

fn user_by_id_query(id: i64) -> Vec<(&'static str, String)> {
    vec![
        ("select", USER_SELECT.to_string()),
        ("id", format!("eq.{}", id)),
        ("limit", "1".to_string()),
    ]
}

/// Case-insensitive exact match on email.
fn user_by_email_query(email: &str) -> Vec<(&'static str, String)> {
    vec![
        ("select", USER_SELECT.to_string()),
        ("email", format!("ilike.{}", escape_like(email.trim()))),
        active_user_filter(),
        ("limit", "1".to_string()),
    ]
}

fn listings_query(limit: Option<usize>) -> Vec<(&'static str, String)> {
    with_limit(
        vec![
            ("select", LISTING_SELECT.to_string()),
            available_listing_filter(),
            ("order", "created_at.desc".to_string()),
        ],
        limit,
    )
}

fn compatibility_query(category: &Category) -> Vec<(&'static str, String)> {
    vec![
        ("select", "tipo_compatible".to_string()),
        ("tipo_origen", format!("eq.{}", backend_category(category))),
    ]
}

/// Split "Ciudad, País" into its parts; a single part is taken as the city.
fn split_location(location: &str) -> (String, Option<String>) {
    match location.split_once(',') {
        Some((city, country)) => (city.trim().to_string(), Some(country.trim().to_string())),
        None => (location.trim().to_string(), None),
    }
}

#[async_trait]
impl DataProvider for SupabaseProvider {
    fn name(&self) -> &'static str {
        "supabase"
    }

    async fn list_users(&self, limit: Option<usize>) -> Result<Vec<User>> {
        let rows: Vec<UserRow> = self.select("users", &users_query(limit)).await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        let rows: Vec<UserRow> = self.select("users", &user_by_id_query(id)).await?;
        Ok(rows.into_iter().next().map(User::from))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let rows: Vec<UserRow> = self.select("users", &user_by_email_query(email)).await?;
        Ok(rows.into_iter().next().map(User::from))
    }

    async fn count_users(&self) -> Result<usize> {
        self.count("users", &[active_user_filter()]).await
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        let created: Vec<IdRow> = self
            .insert(
                "users",
                &json!({
                    "nombre": user.name,
                    "email": user.email,
                    "edad": user.age,
                    "experiencia_anos": user.experience_years,
                    "ubicacion": user.location,
                    "valoracion_promedio": user.rating,
                    "puntos": user.points,
                    "estado": "activo",
                }),
            )
            .await?;
        let id = created
            .first()
            .map(|row| row.id)
            .ok_or_else(|| MotoSwapError::Api {
                message: "Supabase returned no row for the new user".to_string(),
            })?;

        let moto = &user.motorcycle;
        let _: Vec<serde_json::Value> = self
            .insert(
                "motorcycles",
                &json!({
                    "user_id": id,
                    "marca": moto.brand,
                    "modelo": moto.model,
                    "tipo": backend_category(&moto.category),
                    "cilindrada": moto.displacement,
                    "licencia": moto.license,
                }),
            )
            .await?;

        if let Some(accommodation) = &user.accommodation {
            let (city, country) = split_location(&user.location);
            let _: Vec<serde_json::Value> = self
                .insert(
                    "accommodations",
                    &json!({
                        "user_id": id,
                        "titulo": format!("{} de {}", accommodation.kind, user.name),
                        "tipo": accommodation.kind,
                        "ciudad": city,
                        "pais": country,
                        "habitaciones": accommodation.rooms,
                        "garaje_tipo": accommodation.garage,
                        "puntos_por_noche": accommodation.points_per_night,
                        "descripcion": accommodation.description,
                        "disponible": true,
                    }),
                )
                .await?;
        }

        debug!("Created user: {} with id {}", user.name, id);
        Ok(user.into_user(id))
    }

    async fn list_listings(&self, limit: Option<usize>) -> Result<Vec<Listing>> {
        let rows: Vec<AccommodationRow> =
            self.select("accommodations", &listings_query(limit)).await?;
        Ok(rows.into_iter().map(Listing::from).collect())
    }

    async fn count_listings(&self) -> Result<usize> {
        self.count("accommodations", &[available_listing_filter()]).await
    }

    async fn compatible_categories(&self, category: &Category) -> Result<Vec<Category>> {
        let rows: Vec<CompatibilityRow> = self
            .select("motorcycle_compatibility", &compatibility_query(category))
            .await?;

        if rows.is_empty() {
            warn!("No compatibility rows for '{}', using built-in table", category);
            return Ok(resolve_compatible(category));
        }

        let mut categories: Vec<Category> = Vec::with_capacity(rows.len());
        for row in rows {
            let parsed = Category::from(row.tipo_compatible);
            if !categories.contains(&parsed) {
                categories.push(parsed);
            }
        }
        Ok(categories)
    }

    async fn get_messages(&self, user_a: i64, user_b: i64, limit: usize) -> Result<Vec<Message>> {
        let rows: Vec<MessageRow> = self
            .select(
                "messages",
                &[
                    ("select", "*".to_string()),
                    (
                        "or",
                        format!(
                            "(and(remitente_id.eq.{a},destinatario_id.eq.{b}),and(remitente_id.eq.{b},destinatario_id.eq.{a}))",
                            a = user_a,
                            b = user_b
                        ),
                    ),
                    ("order", "created_at.asc".to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().map(Message::from).collect())
    }

    async fn send_message(&self, message: NewMessage) -> Result<Message> {
        let rows: Vec<MessageRow> = self
            .insert(
                "messages",
                &json!({
                    "remitente_id": message.sender_id,
                    "destinatario_id": message.recipient_id,
                    "contenido": message.content,
                    "tipo": kind_label(message.kind),
                }),
            )
            .await?;
        rows.into_iter()
            .next()
            .map(Message::from)
            .ok_or_else(|| MotoSwapError::Api {
                message: "Supabase returned no row for the new message".to_string(),
            })
    }

    async fn count_messages(&self) -> Result<usize> {
        self.count("messages", &[]).await
    }

    async fn test_connection(&self) -> Result<bool> {
        let resp = self
            .client
            .get(self.table_url("users"))
            .query(&[("select", "id"), ("limit", "1")])
            .send()
            .await?;
        Ok(resp.status().is_success())
    }
}
