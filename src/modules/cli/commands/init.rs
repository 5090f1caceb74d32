//! Init command implementation

use clap::Args;
use magicchat_core::MagicChatError;
use std::fs;
use std::path::Path;
use tracing::info;

/// Init command arguments
#[derive(Args, Debug)]
pub struct InitCommand {
    /// Project name
    #[arg(default_value = "movie-magic")]
    pub name: String,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub output: String,

    /// Collection to search
    #[arg(short = 'C', long, default_value = "MovieDemo")]
    pub collection: String,
}

impl InitCommand {
    /// Execute the init command
    pub async fn execute(&self) -> Result<(), MagicChatError> {
        info!("Initializing new Magic Chat project: {}", self.name);

        let output_dir = Path::new(&self.output);
        if !output_dir.exists() {
            fs::create_dir_all(output_dir)?;
        }

        // Generate config file
        let config_path = output_dir.join("config.magic");
        let config_content = self.generate_config();

        fs::write(&config_path, config_content)?;

        info!("Created: {}", config_path.display());

        // Generate .env.example file
        let env_path = output_dir.join(".env.example");
        let env_content = self.generate_env_example();

        fs::write(&env_path, env_content)?;

        info!("Created: {}", env_path.display());

        // Print instructions
        println!("\n✨ Magic Chat project initialized!");
        println!("\nNext steps:");
        println!("  1. Copy .env.example to .env and set your cluster URL and keys");
        println!("  2. Seed the collection: magicchat load data/movies.json");
        println!("  3. Run: magicchat run -f config.magic");

        Ok(())
    }

    /// Generate configuration file content
    fn generate_config(&self) -> String {
        format!(
            r#"# Magic Chat Configuration (.magic)

name: {}

connection:
  url: "{{{{ env.WEAVIATE_URL }}}}"
  api_key: "{{{{ env.WEAVIATE_API_KEY }}}}"
  headers:
    X-Cohere-Api-Key: "{{{{ env.COHERE_API_KEY }}}}"

search:
  collection: {}
  properties:
    - title
    - tagline
    - poster
  limit: 10
  alpha: 0.7
  cache_ttl_secs: 3600

server:
  port: 8080
  log_level: 1
"#,
            self.name, self.collection
        )
    }

    /// Generate .env.example content
    fn generate_env_example(&self) -> String {
        r#"# Vector database endpoint and key
WEAVIATE_URL=https://your-cluster.weaviate.network
WEAVIATE_API_KEY=your-api-key

# Provider key for the remote generative module
COHERE_API_KEY=your-provider-key
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_config() {
        let cmd = InitCommand {
            name: "card-magic".to_string(),
            output: ".".to_string(),
            collection: "MagicCard".to_string(),
        };

        let config = cmd.generate_config();
        assert!(config.contains("name: card-magic"));
        assert!(config.contains("collection: MagicCard"));
        assert!(config.contains("{{ env.WEAVIATE_URL }}"));
    }

    #[tokio::test]
    async fn test_init_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = InitCommand {
            name: "movie-magic".to_string(),
            output: dir.path().to_string_lossy().to_string(),
            collection: "MovieDemo".to_string(),
        };

        cmd.execute().await.unwrap();
        assert!(dir.path().join("config.magic").exists());
        assert!(dir.path().join(".env.example").exists());
    }
}
