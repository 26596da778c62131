use motoswap::constants::{AUTO_REPLIES, STARTING_POINTS};
use motoswap::session::default_accommodation;
use motoswap::{
    ChatService, DataService, Direction, FixtureProvider, MotoSwapError, RegistrationForm,
    Section, Session,
};
use motoswap_core::{Category, MessageKind};
use std::sync::Arc;
use std::time::Duration;

fn data_service() -> DataService {
    DataService::new(Arc::new(FixtureProvider::new()), Duration::from_secs(300))
}

fn registration(email: &str) -> RegistrationForm {
    RegistrationForm {
        name: "Elena Vidal".to_string(),
        email: email.to_string(),
        age: Some(34),
        experience: Some(9),
        brand: "Moto Guzzi".to_string(),
        model: "V85 TT".to_string(),
        category: "Adventure/Trail".to_string(),
        license: "A".to_string(),
        displacement: "853cc".to_string(),
        location: "Girona, España".to_string(),
    }
}

#[tokio::test]
async fn test_demo_login_picks_first_user() {
    let service = data_service();
    let mut session = Session::new();

    let user = session.login_demo(&service).await.unwrap();
    assert_eq!(user.id, 1);
    assert_eq!(user.name, "Carlos Rodríguez");
    assert_eq!(session.section(), Section::Dashboard);
}

#[tokio::test]
async fn test_login_with_email() {
    let service = data_service();
    let mut session = Session::new();

    assert!(!session.login_with_email(&service, "nadie@motoswap.es").await.unwrap());
    assert!(!session.is_logged_in());
    assert_eq!(session.section(), Section::Home);

    assert!(session
        .login_with_email(&service, "laura.fernandez@motoswap.es")
        .await
        .unwrap());
    assert_eq!(session.current_user().map(|u| u.id), Some(6));
}

#[tokio::test]
async fn test_register_validates_and_logs_in() {
    let service = data_service();
    let mut session = Session::new();

    let mut incomplete = registration("elena@motoswap.es");
    incomplete.license.clear();
    let err = session.register(&service, incomplete).await.unwrap_err();
    assert!(matches!(err, MotoSwapError::MissingField(ref f) if f == "license"));
    assert!(!session.is_logged_in());

    let user = session
        .register(&service, registration("elena@motoswap.es"))
        .await
        .unwrap()
        .clone();
    assert_eq!(user.id, 11);
    assert_eq!(user.points, STARTING_POINTS);
    assert_eq!(user.motorcycle.category, Category::AdventureTrail);
    assert_eq!(user.accommodation, Some(default_accommodation()));
    assert_eq!(session.section(), Section::Dashboard);

    // The new host shows up in listings immediately
    let listings = service.listings(20).await;
    assert!(listings.iter().any(|l| l.owner_name == "Elena Vidal"));
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let service = data_service();
    let mut session = Session::new();

    let err = session
        .register(&service, registration("Carlos.Rodriguez@motoswap.es"))
        .await
        .unwrap_err();
    assert!(matches!(err, MotoSwapError::DuplicateEmail(_)));
}

#[tokio::test]
async fn test_logout_resets_section() {
    let service = data_service();
    let mut session = Session::new();
    session.login_demo(&service).await.unwrap();
    session.navigate(Section::Messages);

    session.logout();
    assert!(session.current_user().is_none());
    assert_eq!(session.section(), Section::Home);
}

#[tokio::test]
async fn test_blank_message_is_ignored() {
    let service = data_service();
    let mut session = Session::new();
    session.login_demo(&service).await.unwrap();
    let chat = ChatService::new(&service, Duration::ZERO);

    assert!(chat.send(&session, 2, "   ").await.unwrap().is_none());
    assert!(chat.send_with_auto_reply(&session, 2, "").await.unwrap().is_none());
    assert_eq!(service.stats().await.total_messages, 3);
}

#[tokio::test]
async fn test_auto_reply_is_persisted() {
    let service = data_service();
    let mut session = Session::new();
    session.login_demo(&service).await.unwrap();
    let chat = ChatService::new(&service, Duration::from_millis(5));

    let (sent, reply) = chat
        .send_with_auto_reply(&session, 3, "  ¿Tienes sitio para una GS?  ")
        .await
        .unwrap()
        .unwrap();
    let reply = reply.unwrap();

    assert_eq!(sent.content, "¿Tienes sitio para una GS?");
    assert_eq!(reply.kind, MessageKind::AutoReply);
    assert_eq!((reply.sender_id, reply.recipient_id), (3, 1));
    assert!(AUTO_REPLIES.contains(&reply.content.as_str()));

    let lines = chat.conversation(&session, 3).await.unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].direction, Direction::Sent);
    assert_eq!(lines[1].direction, Direction::Received);
}
