use rand::Rng;

/// Points per night shown for a listing without a configured price, in `[50, 150)`.
pub fn random_points() -> i64 {
    rand::thread_rng().gen_range(50..150)
}

/// One star per whole rating point ("4.8" -> four stars).
pub fn rating_stars(rating: f64) -> String {
    if !rating.is_finite() || rating < 1.0 {
        return String::new();
    }
    "⭐".repeat(rating.floor() as usize)
}
