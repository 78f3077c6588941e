use crate::args::InitArgs;
use crate::commands::Out;
use crate::{Config, Result};
use std::path::Path;

/// Creates the home directory along with:
/// - an initial `config.json` naming the storage backend and currency
/// - an empty data file for that backend
///
/// # Arguments
/// - `home` - The directory that will be the home directory, e.g. `$HOME/fintrack`
/// - `args` - The storage backend and currency label.
///
/// # Errors
/// - Returns a `Config` error if `home` already holds a configuration.
/// - Returns a `Storage` error if the data file cannot be created.
pub async fn init(home: &Path, args: &InitArgs) -> Result<Out<()>> {
    let config = Config::create(home, args.storage(), args.currency()).await?;
    Ok(format!(
        "Successfully created the fintrack directory at '{}' with {} storage",
        config.root().display(),
        config.storage_kind()
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageKind;
    use crate::ErrorType;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_then_load() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("fintrack");
        let out = init(&home, &InitArgs::new(StorageKind::Json, "USD"))
            .await
            .unwrap();
        assert!(out.message().contains("json storage"), "{}", out.message());
        let config = Config::load(&home).await.unwrap();
        assert_eq!(config.currency(), "USD");
        assert_eq!(config.storage_kind(), StorageKind::Json);
    }

    #[tokio::test]
    async fn test_init_twice_fails() {
        let dir = TempDir::new().unwrap();
        let args = InitArgs::new(StorageKind::Sqlite, "MAD");
        init(dir.path(), &args).await.unwrap();
        let e = init(dir.path(), &args).await.unwrap_err();
        assert_eq!(e.error_type(), ErrorType::Config);
    }
}
