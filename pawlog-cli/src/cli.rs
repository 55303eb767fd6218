use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};

use pawlog_core::{
    Config, DocumentStore, Fields, PuppyProfile, StoreRef, UserProfile, WalkRecord, WeatherClient,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "pawlog", version, about = "Puppy walk log")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the weather API key and the document-store endpoint.
    Configure,

    /// Show current conditions for a coordinate.
    Current {
        #[arg(long)]
        lat: f64,
        #[arg(long)]
        lon: f64,
    },

    /// Show the daily forecast for a coordinate.
    Forecast {
        #[arg(long)]
        lat: f64,
        #[arg(long)]
        lon: f64,
    },

    /// User profile operations.
    User {
        #[command(subcommand)]
        command: UserCommand,
    },

    /// Puppy profile operations.
    Puppy {
        #[command(subcommand)]
        command: PuppyCommand,
    },

    /// Walk-record operations.
    Record {
        #[command(subcommand)]
        command: RecordCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Print a user profile.
    Show { uid: String },

    /// Create or overwrite a user profile.
    Set {
        uid: String,
        #[arg(long)]
        name: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum PuppyCommand {
    /// List every puppy of a user.
    List { uid: String },

    /// Print one puppy profile.
    Show { uid: String, puppy_id: String },

    /// Create or overwrite a puppy profile.
    Add {
        uid: String,
        puppy_id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        species: String,
        /// Birth date, e.g. 2019-02-05.
        #[arg(long)]
        age: String,
        #[arg(long)]
        weight: f64,
    },

    /// Update a puppy's weight.
    Update {
        uid: String,
        puppy_id: String,
        #[arg(long)]
        weight: f64,
    },

    /// Delete a puppy profile.
    Delete { uid: String, puppy_id: String },
}

#[derive(Debug, Subcommand)]
pub enum RecordCommand {
    /// List a puppy's walk records.
    List { uid: String, puppy_id: String },

    /// Record a walk for today.
    Add { uid: String, puppy_id: String },

    /// Delete a walk record.
    Delete {
        uid: String,
        puppy_id: String,
        record_id: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),

            Command::Current { lat, lon } => {
                let current = weather_client()?.fetch_current(lat, lon).await?;
                println!("condition {} / {:.1}°C", current.condition_id, current.temperature_c);
                Ok(())
            }

            Command::Forecast { lat, lon } => {
                let days = weather_client()?.fetch_forecast(lat, lon).await?;
                for day in days {
                    println!(
                        "{:<9} condition {} / {:.1}°C .. {:.1}°C",
                        day.weekday, day.condition_id, day.temp_min_c, day.temp_max_c
                    );
                }
                Ok(())
            }

            Command::User { command } => run_user(command).await,
            Command::Puppy { command } => run_puppy(command).await,
            Command::Record { command } => run_record(command).await,
        }
    }
}

async fn run_user(command: UserCommand) -> anyhow::Result<()> {
    let store = document_store()?;

    match command {
        UserCommand::Show { uid } => {
            let user: UserProfile = store.fetch_one(&StoreRef::user(&uid)).await?;
            println!("{uid}: {}", user.name);
        }
        UserCommand::Set { uid, name } => {
            store.replace(&StoreRef::user(&uid), &UserProfile { name }).await?;
            println!("Saved user {uid}");
        }
    }

    Ok(())
}

async fn run_puppy(command: PuppyCommand) -> anyhow::Result<()> {
    let store = document_store()?;

    match command {
        PuppyCommand::List { uid } => {
            let puppies: Vec<PuppyProfile> = store.fetch_all(&StoreRef::puppies(&uid)).await?;
            for puppy in puppies {
                println!("{} ({}) born {} / {:.1}kg", puppy.name, puppy.species, puppy.age, puppy.weight);
            }
        }
        PuppyCommand::Show { uid, puppy_id } => {
            let puppy: PuppyProfile = store.fetch_one(&StoreRef::puppy(&uid, &puppy_id)).await?;
            println!("{} ({}) born {} / {:.1}kg", puppy.name, puppy.species, puppy.age, puppy.weight);
        }
        PuppyCommand::Add {
            uid,
            puppy_id,
            name,
            species,
            age,
            weight,
        } => {
            let puppy = PuppyProfile {
                name,
                species,
                age,
                weight,
            };
            store.replace(&StoreRef::puppy(&uid, &puppy_id), &puppy).await?;
            println!("Saved puppy {puppy_id}");
        }
        PuppyCommand::Update { uid, puppy_id, weight } => {
            let patch = to_fields(serde_json::json!({ "weight": weight }));
            store.update(&StoreRef::puppy(&uid, &puppy_id), &patch).await?;
            println!("Updated puppy {puppy_id}");
        }
        PuppyCommand::Delete { uid, puppy_id } => {
            store.delete(&StoreRef::puppy(&uid, &puppy_id)).await?;
            println!("Deleted puppy {puppy_id}");
        }
    }

    Ok(())
}

async fn run_record(command: RecordCommand) -> anyhow::Result<()> {
    let store = document_store()?;

    match command {
        RecordCommand::List { uid, puppy_id } => {
            let records: Vec<WalkRecord> =
                store.fetch_all(&StoreRef::records(&uid, &puppy_id)).await?;
            for record in records {
                println!("{}", record.day_stamp);
            }
        }
        RecordCommand::Add { uid, puppy_id } => {
            let fields = to_fields(serde_json::json!({ "dayStamp": Utc::now() }));
            let id = store.create(&StoreRef::records(&uid, &puppy_id), &fields).await?;
            println!("Recorded walk {id}");
        }
        RecordCommand::Delete {
            uid,
            puppy_id,
            record_id,
        } => {
            store.delete(&StoreRef::record(&uid, &puppy_id, &record_id)).await?;
            println!("Deleted record {record_id}");
        }
    }

    Ok(())
}

fn to_fields(value: serde_json::Value) -> Fields {
    match value {
        serde_json::Value::Object(map) => map,
        _ => unreachable!("field mappings are JSON objects"),
    }
}

/// Interactive one-time setup: weather key and store endpoint.
fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_weather_api_key(api_key);

    let store_url = Text::new("Document store base URL:")
        .with_initial_value(config.store_base_url().unwrap_or_default())
        .prompt()
        .context("Failed to read store URL")?;
    if !store_url.is_empty() {
        config.set_store_base_url(store_url);
    }

    config.save()?;
    println!("Configuration saved to {}", Config::config_file_path()?.display());

    Ok(())
}

fn weather_client() -> anyhow::Result<WeatherClient> {
    let config = Config::load()?;

    let api_key = config.weather_api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No weather API key configured.\n\
             Hint: run `pawlog configure` and enter your OpenWeather key."
        )
    })?;

    Ok(WeatherClient::with_base_url(api_key, config.weather_base_url())?)
}

fn document_store() -> anyhow::Result<DocumentStore> {
    let config = Config::load()?;

    let base_url = config.store_base_url().ok_or_else(|| {
        anyhow::anyhow!(
            "No document store configured.\n\
             Hint: run `pawlog configure` and enter the store base URL."
        )
    })?;

    Ok(DocumentStore::new(base_url)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_fields_extracts_object_entries() {
        let fields = to_fields(serde_json::json!({ "weight": 11.2 }));
        assert_eq!(fields.get("weight"), Some(&serde_json::json!(11.2)));
    }

    #[test]
    #[should_panic(expected = "field mappings are JSON objects")]
    fn to_fields_rejects_non_objects() {
        to_fields(serde_json::json!([1, 2, 3]));
    }
}
