// services/admin-dash/src/mock.rs
//
// Sample content for demo mode (no backend required)

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::Rng;
use serde_json::json;

use svckit::MemoryTransport;

const CLUBS: [(&str, &str, u32, &str, &str); 6] = [
    ("Raja Club Athletic", "Stade Mohammed V", 45_000, "1949-03-20", "Casablanca"),
    ("Wydad AC", "Stade Mohammed V", 45_000, "1937-05-08", "Casablanca"),
    ("AS FAR", "Stade Moulay Abdellah", 52_000, "1958-09-01", "Rabat"),
    ("RS Berkane", "Stade Municipal de Berkane", 15_000, "1938-01-01", "Berkane"),
    ("FUS Rabat", "Stade Moulay Hassan", 12_000, "1946-01-01", "Rabat"),
    ("Hassania Agadir", "Stade Adrar", 45_480, "1946-04-14", "Agadir"),
];

const COMPETITIONS: [(&str, &str, &str, &str); 5] = [
    ("Botola Pro", "2024-2025", "Maroc", "national"),
    ("Coupe du Trône", "2024-2025", "Maroc", "national"),
    ("Ligue des Champions CAF", "2024-2025", "Afrique", "continental"),
    ("Coupe de la Confédération", "2024-2025", "Afrique", "continental"),
    ("Coupe du Monde des Clubs", "2025", "États-Unis", "international"),
];

const HEADLINES: [&str; 8] = [
    "Le Raja s'impose dans le derby",
    "Mercato : trois recrues pour le Wydad",
    "L'AS FAR qualifiée pour les quarts",
    "Berkane remporte la Coupe de la Confédération",
    "Nouveau record d'affluence au Stade Adrar",
    "La Botola Pro dévoile son calendrier",
    "Entretien avec l'entraîneur du FUS",
    "Le VAR fait ses débuts en Coupe du Trône",
];

const STATUSES: [&str; 5] = ["a_venir", "en_cours", "termine", "reporte", "annule"];
const REFEREES: [&str; 4] = ["R. Jiyed", "N. El Ghourdi", "S. Lahrach", "J. Ayoub"];

pub struct DemoSeeder {
    now: DateTime<Utc>,
}

impl DemoSeeder {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    pub fn seed(&self, backend: &MemoryTransport) {
        let mut rng = rand::thread_rng();

        for (name, stadium, capacity, founded, city) in CLUBS {
            backend.seed("clubs", json!({
                "nom": name,
                "fondation": founded,
                "stade": stadium,
                "capacite": capacity,
                "entraineur": "",
                "president": "",
                "siteWeb": "",
                "description": format!("Club de {}", city),
            }));
        }

        for (name, season, country, level) in COMPETITIONS {
            backend.seed("competitions", json!({
                "nom": name,
                "saison": season,
                "pays": country,
                "niveau": level,
                "description": "",
                "dateDebut": "2024-08-30",
                "dateFin": "2025-06-15",
            }));
        }

        for i in 0..10 {
            let home = CLUBS[rng.gen_range(0..CLUBS.len())];
            let away = CLUBS[(i + 1) % CLUBS.len()];
            let offset = Duration::days(rng.gen_range(-30..30)) + Duration::hours(rng.gen_range(14..22));
            let status = STATUSES[rng.gen_range(0..STATUSES.len())];
            backend.seed("matches", json!({
                "titre": format!("{} - {}", home.0, away.0),
                "contenu": "",
                "dateMatch": self.stamp(self.now + offset),
                "statut": status,
                "stade": home.1,
                "arbitre": REFEREES[rng.gen_range(0..REFEREES.len())],
                "resume": "",
            }));
        }

        for headline in HEADLINES {
            let published = self.now - Duration::days(rng.gen_range(0..180));
            backend.seed("articles", json!({
                "titre": headline,
                "contenu": format!("{}.", headline),
                "publishedAt": self.stamp(published),
            }));
        }
    }

    fn stamp(&self, at: DateTime<Utc>) -> String {
        at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}
