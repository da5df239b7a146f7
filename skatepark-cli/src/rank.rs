//! Rank command implementation for the skatepark CLI.

use std::io::Write;
use std::str::FromStr;

use camino::Utf8PathBuf;
use clap::Parser;
use geo::Coord;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use skatepark_core::search::{AreaFilter, SearchCriteria, SortMode, rank_parks};
use skatepark_core::{Amenity, Area, Locale, Park, ParkStore, haversine_km};

use crate::catalogue::{load_store, require_catalogue};
use crate::{
    ARG_CATALOGUE, ARG_RANK_AMENITY, ARG_RANK_AREA, ARG_RANK_LAT, ARG_RANK_LOCALE, ARG_RANK_LON,
    ARG_RANK_QUERY, ARG_RANK_SORT, CliError, ENV_RANK_CATALOGUE, write_json,
};

/// CLI arguments for the `rank` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "List the parks of a JSON catalogue. A non-empty query \
                 matches localized names and orders by relevance; otherwise \
                 the sort mode applies. Distance sorting needs both --lat \
                 and --lon.",
    about = "Filter and order the parks in a catalogue"
)]
#[ortho_config(prefix = "SKATEPARK")]
pub(crate) struct RankArgs {
    /// Path to the JSON park catalogue.
    #[arg(long = ARG_CATALOGUE, value_name = "path")]
    #[serde(default)]
    pub(crate) catalogue: Option<Utf8PathBuf>,
    /// Free-text search over park names in the chosen locale.
    #[arg(long = ARG_RANK_QUERY, value_name = "text")]
    #[serde(default)]
    pub(crate) query: Option<String>,
    /// Area to list: north, center, south or all.
    #[arg(long = ARG_RANK_AREA, value_name = "area")]
    #[serde(default)]
    pub(crate) area: Option<String>,
    /// Amenity every listed park must offer. Repeat for several.
    #[arg(long = ARG_RANK_AMENITY, value_name = "amenity")]
    #[serde(default)]
    pub(crate) amenity: Vec<String>,
    /// Ordering without a query: none, rating, distance or difficulty.
    #[arg(long = ARG_RANK_SORT, value_name = "mode")]
    #[serde(default)]
    pub(crate) sort: Option<String>,
    /// Latitude of the user, in degrees.
    #[arg(long = ARG_RANK_LAT, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude of the user, in degrees.
    #[arg(long = ARG_RANK_LON, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lon: Option<f64>,
    /// Language used for names: en or he.
    #[arg(long = ARG_RANK_LOCALE, value_name = "locale")]
    #[serde(default)]
    pub(crate) locale: Option<String>,
}

impl RankArgs {
    pub(crate) fn into_config(self) -> Result<RankConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RankConfig::try_from(merged)
    }
}

/// Resolved `rank` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RankConfig {
    /// Path to the JSON catalogue.
    pub(crate) catalogue: Utf8PathBuf,
    /// Filters, query and ordering.
    pub(crate) criteria: SearchCriteria,
    /// Language used for matching and display.
    pub(crate) locale: Locale,
}

impl TryFrom<RankArgs> for RankConfig {
    type Error = CliError;

    fn try_from(args: RankArgs) -> Result<Self, Self::Error> {
        let catalogue = args.catalogue.ok_or(CliError::MissingArgument {
            field: ARG_CATALOGUE,
            env: ENV_RANK_CATALOGUE,
        })?;

        let mut criteria = SearchCriteria::new()
            .with_query(args.query.unwrap_or_default())
            .in_area(parse_field::<AreaFilter>(ARG_RANK_AREA, args.area)?.unwrap_or_default())
            .sorted_by(parse_field::<SortMode>(ARG_RANK_SORT, args.sort)?.unwrap_or_default());
        for raw in args.amenity {
            let amenity = Amenity::from_str(&raw).map_err(|reason| CliError::InvalidArgument {
                field: ARG_RANK_AMENITY,
                reason,
            })?;
            criteria = criteria.requiring(amenity);
        }
        if let Some(location) = user_location(args.lat, args.lon)? {
            criteria = criteria.near(location);
        }
        let locale = parse_field::<Locale>(ARG_RANK_LOCALE, args.locale)?.unwrap_or_default();

        Ok(Self {
            catalogue,
            criteria,
            locale,
        })
    }
}

fn parse_field<T>(field: &'static str, raw: Option<String>) -> Result<Option<T>, CliError>
where
    T: FromStr<Err = String>,
{
    raw.map(|value| T::from_str(&value))
        .transpose()
        .map_err(|reason| CliError::InvalidArgument { field, reason })
}

fn user_location(lat: Option<f64>, lon: Option<f64>) -> Result<Option<Coord<f64>>, CliError> {
    match (lat, lon) {
        (None, None) => Ok(None),
        (Some(_), None) => Err(CliError::InvalidArgument {
            field: ARG_RANK_LON,
            reason: format!("--{ARG_RANK_LAT} needs a matching --{ARG_RANK_LON}"),
        }),
        (None, Some(_)) => Err(CliError::InvalidArgument {
            field: ARG_RANK_LAT,
            reason: format!("--{ARG_RANK_LON} needs a matching --{ARG_RANK_LAT}"),
        }),
        (Some(y), Some(x)) => {
            if !(-90.0..=90.0).contains(&y) {
                return Err(CliError::InvalidArgument {
                    field: ARG_RANK_LAT,
                    reason: format!("{y} is outside -90..=90"),
                });
            }
            if !(-180.0..=180.0).contains(&x) {
                return Err(CliError::InvalidArgument {
                    field: ARG_RANK_LON,
                    reason: format!("{x} is outside -180..=180"),
                });
            }
            Ok(Some(Coord { x, y }))
        }
    }
}

/// One row of `rank` output.
#[derive(Debug, Serialize)]
struct RankedPark<'a> {
    id: &'a str,
    name: &'a str,
    area: Area,
    rating: f64,
    votes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    difficulty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    distance_km: Option<f64>,
}

impl<'a> RankedPark<'a> {
    fn new(park: &'a Park, config: &RankConfig) -> Self {
        let distance_km = config
            .criteria
            .user_location
            .zip(park.known_location())
            .map(|(origin, location)| haversine_km(origin, location));
        Self {
            id: park.id.as_str(),
            name: park.names.resolve(config.locale),
            area: park.area,
            rating: park.rating.sanitised_average(),
            votes: park.rating.count,
            difficulty: park.difficulty.map(|pool| pool.sanitised_average()),
            distance_km,
        }
    }
}

pub(super) fn run_rank(args: RankArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_rank_with(args, &mut stdout)
}

pub(super) fn run_rank_with(args: RankArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = resolve_rank_config(args)?;
    let store = load_store(&config.catalogue)?;
    let ranked = rank_parks(store.parks(), &config.criteria, &config.locale);
    log::debug!("Listing {} of {} parks", ranked.len(), store.parks().len());
    let rows: Vec<RankedPark<'_>> = ranked
        .into_iter()
        .map(|park| RankedPark::new(park, &config))
        .collect();
    write_json(writer, &rows)
}

fn resolve_rank_config(args: RankArgs) -> Result<RankConfig, CliError> {
    let config = args.into_config()?;
    require_catalogue(&config.catalogue)?;
    Ok(config)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RankConfig, CliError> {
    let merged = RankArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RankConfig::try_from(merged)
}
