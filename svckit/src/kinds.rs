// svckit/src/kinds.rs
//
// The four record kinds expressed as descriptors

use crate::display::{
    format_capacity, format_date_range, format_day_time, format_optional_day, initials,
    resolve_media_url,
};
use crate::errors::ContentError;
use crate::resource::{parse_number, unknown_field, FieldKind, FieldSpec, FormFields, Resource, Wording};
use crate::types::{
    Article, ArticleFields, Club, ClubFields, Competition, CompetitionFields, CompetitionLevel,
    Match, MatchFields, MatchStatus, Media,
};

pub const LEVEL_CHOICES: &[(&str, &str)] = &[
    ("national", "National"),
    ("continental", "Continental"),
    ("international", "International"),
];

pub const STATUS_CHOICES: &[(&str, &str)] = &[
    ("a_venir", "À venir"),
    ("en_cours", "En cours"),
    ("termine", "Terminé"),
    ("reporte", "Reporté"),
    ("annule", "Annulé"),
];

fn logo_cell(logo: Option<&Media>, name: &str, origin: &str) -> String {
    logo.and_then(Media::thumbnail_url)
        .map(|url| resolve_media_url(origin, url))
        .unwrap_or_else(|| initials(name))
}

// ---------------------------------------------------------------------------
// Articles
// ---------------------------------------------------------------------------

impl FormFields for ArticleFields {
    const SPECS: &'static [FieldSpec] = &[
        FieldSpec::text("titre", "Titre"),
        FieldSpec::of("contenu", "Contenu", FieldKind::LongText),
    ];

    fn value(&self, name: &str) -> Option<String> {
        match name {
            "titre" => Some(self.title.clone()),
            "contenu" => Some(self.body.clone()),
            _ => None,
        }
    }

    fn set_value(&mut self, name: &str, input: &str) -> Result<(), ContentError> {
        match name {
            "titre" => self.title = input.to_string(),
            "contenu" => self.body = input.to_string(),
            _ => return Err(unknown_field(name)),
        }
        Ok(())
    }
}

impl Resource for Article {
    type Fields = ArticleFields;

    const PATH: &'static str = "articles";
    const COLUMNS: &'static [&'static str] = &["Titre", "Date de publication"];
    const WORDING: Wording = Wording {
        title: "Articles",
        description: "Liste des articles publiés",
        fetch_action: "de la récupération des articles",
        create_action: "de la création de l'article",
        update_action: "de la mise à jour de l'article",
        delete_action: "de la suppression de l'article",
        created: "Article créé avec succès",
        updated: "Article mis à jour avec succès",
        deleted: "Article supprimé avec succès",
        confirm_delete: "Êtes-vous sûr de vouloir supprimer cet article ?",
        empty: "Aucun article disponible",
        no_match: "Aucun article ne correspond à votre recherche",
        loading: "Chargement des articles...",
        search_placeholder: "Rechercher des articles...",
        new_title: "Nouvel article",
        edit_title: "Modifier l'article",
        create_label: "Créer l'article",
    };

    fn document_id(&self) -> &str {
        &self.document_id
    }

    fn searchable(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.body.as_str()]
    }

    fn fields(&self) -> ArticleFields {
        ArticleFields {
            title: self.title.clone(),
            body: self.body.clone(),
        }
    }

    fn row(&self, _origin: &str) -> Vec<String> {
        vec![self.title.clone(), format_optional_day(self.published_at)]
    }
}

// ---------------------------------------------------------------------------
// Clubs
// ---------------------------------------------------------------------------

impl FormFields for ClubFields {
    const SPECS: &'static [FieldSpec] = &[
        FieldSpec::text("nom", "Nom"),
        FieldSpec::of("fondation", "Date de fondation", FieldKind::Date),
        FieldSpec::text("stade", "Stade"),
        FieldSpec::of("capacite", "Capacité", FieldKind::Number),
        FieldSpec::text("entraineur", "Entraîneur"),
        FieldSpec::text("president", "Président"),
        FieldSpec::text("siteWeb", "Site web"),
        FieldSpec::of("description", "Description", FieldKind::LongText),
    ];

    fn value(&self, name: &str) -> Option<String> {
        let value = match name {
            "nom" => self.name.clone(),
            "fondation" => self.founded.clone(),
            "stade" => self.stadium.clone(),
            "capacite" => self.capacity.to_string(),
            "entraineur" => self.coach.clone(),
            "president" => self.president.clone(),
            "siteWeb" => self.website.clone(),
            "description" => self.description.clone(),
            _ => return None,
        };
        Some(value)
    }

    fn set_value(&mut self, name: &str, input: &str) -> Result<(), ContentError> {
        match name {
            "nom" => self.name = input.to_string(),
            "fondation" => self.founded = input.to_string(),
            "stade" => self.stadium = input.to_string(),
            "capacite" => self.capacity = parse_number(name, input)?,
            "entraineur" => self.coach = input.to_string(),
            "president" => self.president = input.to_string(),
            "siteWeb" => self.website = input.to_string(),
            "description" => self.description = input.to_string(),
            _ => return Err(unknown_field(name)),
        }
        Ok(())
    }
}

impl Resource for Club {
    type Fields = ClubFields;

    const PATH: &'static str = "clubs";
    const POPULATE: Option<&'static str> = Some("logo");
    const COLUMNS: &'static [&'static str] = &["Logo", "Nom", "Stade", "Capacité"];
    const WORDING: Wording = Wording {
        title: "Clubs",
        description: "Liste des clubs disponibles",
        fetch_action: "de la récupération des clubs",
        create_action: "de la création du club",
        update_action: "de la mise à jour du club",
        delete_action: "de la suppression du club",
        created: "Club créé avec succès",
        updated: "Club mis à jour avec succès",
        deleted: "Club supprimé avec succès",
        confirm_delete: "Êtes-vous sûr de vouloir supprimer ce club ?",
        empty: "Aucun club disponible",
        no_match: "Aucun club ne correspond à votre recherche",
        loading: "Chargement des clubs...",
        search_placeholder: "Rechercher des clubs...",
        new_title: "Nouveau club",
        edit_title: "Modifier le club",
        create_label: "Créer le club",
    };

    fn document_id(&self) -> &str {
        &self.document_id
    }

    fn searchable(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.stadium.as_str(), self.description.as_str()]
    }

    fn fields(&self) -> ClubFields {
        ClubFields {
            name: self.name.clone(),
            founded: self.founded.clone(),
            stadium: self.stadium.clone(),
            capacity: self.capacity,
            website: self.website.clone(),
            description: self.description.clone(),
            coach: self.coach.clone(),
            president: self.president.clone(),
        }
    }

    fn row(&self, origin: &str) -> Vec<String> {
        vec![
            logo_cell(self.logo.as_ref(), &self.name, origin),
            self.name.clone(),
            self.stadium.clone(),
            format_capacity(self.capacity),
        ]
    }
}

// ---------------------------------------------------------------------------
// Competitions
// ---------------------------------------------------------------------------

impl FormFields for CompetitionFields {
    const SPECS: &'static [FieldSpec] = &[
        FieldSpec::text("nom", "Nom"),
        FieldSpec::text("saison", "Saison"),
        FieldSpec::text("pays", "Pays"),
        FieldSpec::of("niveau", "Niveau", FieldKind::Choice(LEVEL_CHOICES)),
        FieldSpec::of("dateDebut", "Date de début", FieldKind::Date),
        FieldSpec::of("dateFin", "Date de fin", FieldKind::Date),
        FieldSpec::of("description", "Description", FieldKind::LongText),
    ];

    fn value(&self, name: &str) -> Option<String> {
        let value = match name {
            "nom" => self.name.clone(),
            "saison" => self.season.clone(),
            "pays" => self.country.clone(),
            "niveau" => self.level.as_str().to_string(),
            "dateDebut" => self.start_date.clone(),
            "dateFin" => self.end_date.clone(),
            "description" => self.description.clone(),
            _ => return None,
        };
        Some(value)
    }

    fn set_value(&mut self, name: &str, input: &str) -> Result<(), ContentError> {
        match name {
            "nom" => self.name = input.to_string(),
            "saison" => self.season = input.to_string(),
            "pays" => self.country = input.to_string(),
            "niveau" => self.level = CompetitionLevel::from(input.to_string()),
            "dateDebut" => self.start_date = input.to_string(),
            "dateFin" => self.end_date = input.to_string(),
            "description" => self.description = input.to_string(),
            _ => return Err(unknown_field(name)),
        }
        Ok(())
    }
}

impl Resource for Competition {
    type Fields = CompetitionFields;

    const PATH: &'static str = "competitions";
    const POPULATE: Option<&'static str> = Some("logo");
    const COLUMNS: &'static [&'static str] = &["Logo", "Nom", "Saison", "Pays", "Niveau", "Dates"];
    const WORDING: Wording = Wording {
        title: "Compétitions",
        description: "Liste des compétitions",
        fetch_action: "de la récupération des compétitions",
        create_action: "de la création de la compétition",
        update_action: "de la mise à jour de la compétition",
        delete_action: "de la suppression de la compétition",
        created: "Compétition créée avec succès",
        updated: "Compétition mise à jour avec succès",
        deleted: "Compétition supprimée avec succès",
        confirm_delete: "Êtes-vous sûr de vouloir supprimer cette compétition ?",
        empty: "Aucune compétition disponible",
        no_match: "Aucune compétition ne correspond à votre recherche",
        loading: "Chargement des compétitions...",
        search_placeholder: "Rechercher des compétitions...",
        new_title: "Nouvelle compétition",
        edit_title: "Modifier la compétition",
        create_label: "Créer la compétition",
    };

    fn document_id(&self) -> &str {
        &self.document_id
    }

    fn searchable(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.country.as_str(), self.description.as_str()]
    }

    fn fields(&self) -> CompetitionFields {
        CompetitionFields {
            name: self.name.clone(),
            season: self.season.clone(),
            country: self.country.clone(),
            level: self.level.clone(),
            description: self.description.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
        }
    }

    fn row(&self, origin: &str) -> Vec<String> {
        vec![
            logo_cell(self.logo.as_ref(), &self.name, origin),
            self.name.clone(),
            self.season.clone(),
            self.country.clone(),
            self.level.label(),
            format_date_range(&self.start_date, &self.end_date),
        ]
    }
}

// ---------------------------------------------------------------------------
// Matches
// ---------------------------------------------------------------------------

impl FormFields for MatchFields {
    const SPECS: &'static [FieldSpec] = &[
        FieldSpec::text("titre", "Titre"),
        FieldSpec::of("dateMatch", "Date et heure", FieldKind::DateTime),
        FieldSpec::of("statut", "Statut", FieldKind::Choice(STATUS_CHOICES)),
        FieldSpec::text("stade", "Stade"),
        FieldSpec::text("arbitre", "Arbitre"),
        FieldSpec::of("contenu", "Contenu", FieldKind::LongText),
        FieldSpec::of("resume", "Résumé", FieldKind::LongText),
    ];

    fn value(&self, name: &str) -> Option<String> {
        let value = match name {
            "titre" => self.title.clone(),
            "dateMatch" => self.scheduled_at.clone(),
            "statut" => self.status.as_str().to_string(),
            "stade" => self.stadium.clone(),
            "arbitre" => self.referee.clone(),
            "contenu" => self.body.clone(),
            "resume" => self.summary.clone(),
            _ => return None,
        };
        Some(value)
    }

    fn set_value(&mut self, name: &str, input: &str) -> Result<(), ContentError> {
        match name {
            "titre" => self.title = input.to_string(),
            "dateMatch" => self.scheduled_at = input.to_string(),
            "statut" => self.status = MatchStatus::from(input.to_string()),
            "stade" => self.stadium = input.to_string(),
            "arbitre" => self.referee = input.to_string(),
            "contenu" => self.body = input.to_string(),
            "resume" => self.summary = input.to_string(),
            _ => return Err(unknown_field(name)),
        }
        Ok(())
    }
}

impl Resource for Match {
    type Fields = MatchFields;

    const PATH: &'static str = "matches";
    const COLUMNS: &'static [&'static str] = &["Titre", "Date", "Stade", "Statut"];
    const WORDING: Wording = Wording {
        title: "Matches",
        description: "Liste des matchs programmés",
        fetch_action: "de la récupération des matches",
        create_action: "de la création du match",
        update_action: "de la mise à jour du match",
        delete_action: "de la suppression du match",
        created: "Match créé avec succès",
        updated: "Match mis à jour avec succès",
        deleted: "Match supprimé avec succès",
        confirm_delete: "Êtes-vous sûr de vouloir supprimer ce match ?",
        empty: "Aucun match disponible",
        no_match: "Aucun match ne correspond à votre recherche",
        loading: "Chargement des matchs...",
        search_placeholder: "Rechercher des matchs...",
        new_title: "Nouveau match",
        edit_title: "Modifier le match",
        create_label: "Créer le match",
    };

    fn document_id(&self) -> &str {
        &self.document_id
    }

    fn searchable(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.stadium.as_str(), self.body.as_str()]
    }

    fn fields(&self) -> MatchFields {
        MatchFields {
            title: self.title.clone(),
            body: self.body.clone(),
            scheduled_at: self
                .scheduled_at
                .map(|ts| ts.format("%Y-%m-%dT%H:%M").to_string())
                .unwrap_or_default(),
            status: self.status.clone(),
            stadium: self.stadium.clone(),
            referee: self.referee.clone(),
            summary: self.summary.clone(),
        }
    }

    fn row(&self, _origin: &str) -> Vec<String> {
        vec![
            self.title.clone(),
            self.scheduled_at
                .map(format_day_time)
                .unwrap_or_else(|| "-".to_string()),
            self.stadium.clone(),
            self.status.label().to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn club(name: &str) -> Club {
        Club {
            id: 1,
            document_id: "c1".to_string(),
            name: name.to_string(),
            founded: "1949-03-20".to_string(),
            stadium: "Stade Mohammed V".to_string(),
            capacity: 45000,
            website: String::new(),
            description: String::new(),
            coach: String::new(),
            president: String::new(),
            logo: None,
            created_at: None,
            updated_at: None,
            published_at: None,
        }
    }

    #[test]
    fn test_capacity_coerces_text() {
        let mut fields = ClubFields::default();
        fields.set_value("capacite", "45000").unwrap();
        assert_eq!(fields.capacity, 45000);

        fields.set_value("capacite", "").unwrap();
        assert_eq!(fields.capacity, 0);

        fields.set_value("capacite", "12").unwrap();
        assert!(fields.set_value("capacite", "-3").is_err());
        assert!(fields.set_value("capacite", "beaucoup").is_err());
        assert_eq!(fields.capacity, 12);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut fields = ArticleFields::default();
        assert!(fields.set_value("auteur", "x").is_err());
        assert!(fields.value("auteur").is_none());
    }

    #[test]
    fn test_missing_required() {
        let mut fields = ArticleFields::default();
        assert_eq!(fields.missing_required().map(|s| s.name), Some("titre"));
        fields.set_value("titre", "Derby").unwrap();
        fields.set_value("contenu", "   ").unwrap();
        assert_eq!(fields.missing_required().map(|s| s.label), Some("Contenu"));
        fields.set_value("contenu", "Compte rendu").unwrap();
        assert!(fields.missing_required().is_none());
    }

    #[test]
    fn test_defaults_for_choices() {
        assert_eq!(CompetitionFields::default().value("niveau").as_deref(), Some("national"));
        assert_eq!(MatchFields::default().value("statut").as_deref(), Some("a_venir"));
    }

    #[test]
    fn test_club_row_uses_initials_without_logo() {
        let row = club("Raja").row("http://localhost:1337");
        assert_eq!(row, vec!["RA", "Raja", "Stade Mohammed V", "45 000"]);
        assert_eq!(row.len(), Club::COLUMNS.len());
    }

    #[test]
    fn test_club_row_resolves_logo() {
        let mut c = club("Raja");
        c.logo = Some(Media {
            url: "/uploads/raja.png".to_string(),
            formats: Some(crate::types::MediaFormats {
                thumbnail: Some(crate::types::MediaFormat {
                    url: "/uploads/thumbnail_raja.png".to_string(),
                }),
            }),
        });
        assert_eq!(
            c.row("http://localhost:1337/")[0],
            "http://localhost:1337/uploads/thumbnail_raja.png"
        );
    }

    #[test]
    fn test_match_fields_seed_datetime_local() {
        let m = Match {
            id: 7,
            document_id: "m7".to_string(),
            title: "Classico".to_string(),
            body: String::new(),
            scheduled_at: Some(Utc.with_ymd_and_hms(2025, 4, 12, 19, 30, 0).unwrap()),
            status: MatchStatus::Upcoming,
            stadium: "Stade Mohammed V".to_string(),
            referee: String::new(),
            summary: String::new(),
            created_at: None,
            updated_at: None,
            published_at: None,
        };
        assert_eq!(m.fields().scheduled_at, "2025-04-12T19:30");
        assert_eq!(m.row("")[1], "12 avr. 2025 à 19:30");
        assert_eq!(m.row("")[3], "À venir");
    }
}
