//! Event configuration: cohort roster, competition catalog, infraction
//! catalog.
//!
//! The configuration is read-only input to every other component: the
//! directory validates cohorts against the roster, the ledgers validate
//! cohorts/competitions/infraction codes, and the aggregator derives its
//! row and column sets from it. A built-in default carries the catalog of
//! the original event; deployments may override it with a TOML file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading or validating an event configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML could not be parsed.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The parsed configuration violates a structural invariant.
    #[error("invalid config: {0}")]
    Validation(String),
}

/// One labeled day of the competition catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionDay {
    /// Human label for the day's column group.
    pub label: String,

    /// Competitions held on this day, in catalog order.
    pub competitions: Vec<String>,
}

/// One entry of the disciplinary infraction catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Infraction {
    /// Stable numeric reason code referenced by sanction entries.
    pub code: u32,

    /// Short name of the infraction.
    pub name: String,

    /// Human description shown to staff.
    pub description: String,

    /// Points deducted per occurrence. May be fractional.
    pub points: f64,
}

/// The static event configuration consumed by the directory, the ledgers
/// and the standings aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventConfig {
    /// Ordered cohort roster. Every cohort appears in standings, active
    /// or not.
    #[serde(default = "default_cohorts")]
    pub cohorts: Vec<String>,

    /// Competition catalog grouped by day, in fixed display order.
    #[serde(default = "default_competition_days")]
    pub competition_days: Vec<CompetitionDay>,

    /// Infraction catalog resolved at sanction submission time.
    #[serde(default = "default_infractions")]
    pub infractions: Vec<Infraction>,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            cohorts: default_cohorts(),
            competition_days: default_competition_days(),
            infractions: default_infractions(),
        }
    }
}

impl EventConfig {
    /// Loads a configuration from a TOML file and validates it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML cannot be
    /// parsed, or the parsed configuration fails [`Self::validate`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parses a configuration from a TOML string and validates it.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or the parsed
    /// configuration fails [`Self::validate`].
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks structural invariants: non-empty roster and catalogs, no
    /// duplicate cohorts, competitions, or infraction codes, and finite
    /// non-negative deduction points.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cohorts.is_empty() {
            return Err(ConfigError::Validation("cohort roster is empty".into()));
        }
        let mut seen = std::collections::HashSet::new();
        for cohort in &self.cohorts {
            if cohort.trim().is_empty() {
                return Err(ConfigError::Validation("empty cohort name".into()));
            }
            if !seen.insert(cohort.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate cohort: {cohort}"
                )));
            }
        }
        let mut seen = std::collections::HashSet::new();
        for day in &self.competition_days {
            for competition in &day.competitions {
                if !seen.insert(competition.as_str()) {
                    return Err(ConfigError::Validation(format!(
                        "duplicate competition: {competition}"
                    )));
                }
            }
        }
        if seen.is_empty() {
            return Err(ConfigError::Validation(
                "competition catalog is empty".into(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for infraction in &self.infractions {
            if !seen.insert(infraction.code) {
                return Err(ConfigError::Validation(format!(
                    "duplicate infraction code: {}",
                    infraction.code
                )));
            }
            if !infraction.points.is_finite() || infraction.points < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "infraction {} has invalid points {}",
                    infraction.code, infraction.points
                )));
            }
        }
        Ok(())
    }

    /// Whether the roster contains the named cohort.
    #[must_use]
    pub fn has_cohort(&self, cohort: &str) -> bool {
        self.cohorts.iter().any(|c| c == cohort)
    }

    /// Whether the catalog contains the named competition.
    #[must_use]
    pub fn has_competition(&self, competition: &str) -> bool {
        self.competitions().any(|c| c == competition)
    }

    /// All competitions in catalog order, flattened across days.
    pub fn competitions(&self) -> impl Iterator<Item = &str> {
        self.competition_days
            .iter()
            .flat_map(|day| day.competitions.iter().map(String::as_str))
    }

    /// Looks up an infraction catalog entry by reason code.
    #[must_use]
    pub fn infraction(&self, code: u32) -> Option<&Infraction> {
        self.infractions.iter().find(|i| i.code == code)
    }
}

fn default_cohorts() -> Vec<String> {
    [
        "1° A", "1° B", "1° C", "1° D", "1° E", "1° F",
        "2° A", "2° B", "2° C", "2° D",
        "3° A", "3° B", "3° C", "3° D",
        "4° A", "4° B", "4° C", "4° D",
        "5° A", "5° B", "5° C", "5° D",
    ]
    .map(str::to_string)
    .to_vec()
}

fn default_competition_days() -> Vec<CompetitionDay> {
    let day = |label: &str, competitions: &[&str]| CompetitionDay {
        label: label.to_string(),
        competitions: competitions.iter().map(|c| (*c).to_string()).collect(),
    };
    vec![
        day(
            "Puntajes del primer día",
            &[
                "Presentación y Decoración de Tribuna",
                "Juego de la Silla",
                "Juego del Huevo",
                "Reventa",
            ],
        ),
        day("Puntajes del segundo día", &["Fútbol", "Vóley"]),
        day(
            "Puntajes del tercer día",
            &[
                "Carretilla Humana",
                "Juego de la Bolsa",
                "Elección Rey y Reina (1° Pasada)",
                "Juego Sorpresa",
            ],
        ),
    ]
}

#[allow(clippy::too_many_lines)]
fn default_infractions() -> Vec<Infraction> {
    let entry = |code: u32, name: &str, description: &str, points: f64| Infraction {
        code,
        name: name.to_string(),
        description: description.to_string(),
        points,
    };
    vec![
        entry(
            1,
            "Retraso en la presentación",
            "El curso no se presenta en el horario asignado sin justificación.",
            1.0,
        ),
        entry(
            2,
            "Abandono de escenario sin autorización",
            "Salida intempestiva del escenario sin orden previa.",
            2.0,
        ),
        entry(
            3,
            "Intervención de adultos",
            "Participación directa de un adulto en montaje, armado, dirección, etc.",
            1.0,
        ),
        entry(
            4,
            "Burlas a otro curso",
            "Gestos, risas o señas de desprecio a competidores.",
            2.0,
        ),
        entry(
            5,
            "Uso de materiales no autorizados",
            "Utilización de elementos prohibidos por el reglamento.",
            1.0,
        ),
        entry(
            6,
            "Coreografía ofensiva",
            "Representación que afecte valores, moral o símbolos institucionales.",
            2.0,
        ),
        entry(
            7,
            "Falta de respeto al jurado",
            "Frases o actitudes de falta de respeto hacia el jurado u organización.",
            2.0,
        ),
        entry(
            8,
            "Exceso del tiempo de presentación",
            "Exceder el tiempo estipulado para la puesta en escena.",
            1.0,
        ),
        entry(
            9,
            "Falta de identificación",
            "No portar señalética del curso en escena.",
            0.5,
        ),
        entry(
            10,
            "Desorden al finalizar",
            "Dejar basura o no desmontar elementos tras su participación.",
            1.0,
        ),
        entry(
            11,
            "Retraso en zona de espera",
            "Llegada tardía sin aviso al espacio de prearmado.",
            1.0,
        ),
        entry(
            12,
            "Salida del tinglado",
            "Cada salida injustificada equivale a -1.66 pts. A la tercera: -5 puntos.",
            1.66,
        ),
        entry(
            13,
            "Participante sin acreditación",
            "Estudiante sin credencial oficial del evento.",
            0.5,
        ),
        entry(
            14,
            "Lenguaje vulgar en escena",
            "Palabras ofensivas o inapropiadas en la presentación.",
            1.0,
        ),
        entry(
            15,
            "Desobediencia a fiscalización",
            "Rechazo de advertencias o sugerencias reglamentarias.",
            1.0,
        ),
        entry(
            16,
            "Obstaculizar otra delegación",
            "Interferir en el desarrollo escénico de otro curso.",
            1.5,
        ),
        entry(
            17,
            "Falta a ensayo general",
            "No asistir o llegar tarde al ensayo oficial.",
            0.5,
        ),
        entry(
            18,
            "Uso de pirotecnia no permitida",
            "Uso de fuego o artefactos peligrosos sin autorización.",
            2.0,
        ),
        entry(
            19,
            "No respetar la temática",
            "La propuesta artística no responde a la consigna oficial.",
            1.0,
        ),
        entry(
            20,
            "Agresión entre participantes",
            "Agresión física o verbal grave hacia otro estudiante.",
            5.0,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = EventConfig::default();
        config.validate().expect("default config must validate");
        assert_eq!(config.cohorts.len(), 22);
        assert_eq!(config.competitions().count(), 10);
        assert_eq!(config.infractions.len(), 20);
    }

    #[test]
    fn competitions_flatten_in_day_order() {
        let config = EventConfig::default();
        let all: Vec<&str> = config.competitions().collect();
        assert_eq!(all[0], "Presentación y Decoración de Tribuna");
        assert_eq!(all[4], "Fútbol");
        assert_eq!(all[9], "Juego Sorpresa");
    }

    #[test]
    fn infraction_lookup_resolves_fractional_points() {
        let config = EventConfig::default();
        let infraction = config.infraction(12).expect("code 12 exists");
        assert_eq!(infraction.points, 1.66);
        assert!(config.infraction(99).is_none());
    }

    #[test]
    fn from_toml_accepts_overrides() {
        let config = EventConfig::from_toml(
            r#"
            cohorts = ["6° A", "6° B"]

            [[competition_days]]
            label = "Final"
            competitions = ["Relevos"]

            [[infractions]]
            code = 1
            name = "Retraso"
            description = "Llegada tardía."
            points = 0.5
            "#,
        )
        .expect("valid override config");
        assert_eq!(config.cohorts, vec!["6° A", "6° B"]);
        assert!(config.has_competition("Relevos"));
    }

    #[test]
    fn from_toml_rejects_duplicate_cohorts() {
        let err = EventConfig::from_toml(r#"cohorts = ["1° A", "1° A"]"#).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn from_toml_rejects_negative_points() {
        let err = EventConfig::from_toml(
            r#"
            [[infractions]]
            code = 1
            name = "x"
            description = "y"
            points = -1.0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
