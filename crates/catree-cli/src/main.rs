use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{eyre, Result, WrapErr};
use tracing_subscriber::EnvFilter;

use catree_core::{
    Category, CategoryAttrs, CategoryFilter, CategoryId, CategoryService, CategoryStatus,
    CategoryUpdate, Config, FileStore, NewCategory,
};

#[derive(Parser)]
#[command(name = "catree")]
#[command(about = "Manage a product category tree", long_about = None)]
struct Cli {
    /// Override the data directory from config
    #[arg(long, global = true)]
    data_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a category
    Create {
        #[command(flatten)]
        fields: CategoryFields,
    },
    /// Update a category; unset fields keep their current value
    Update {
        id: u64,
        #[command(flatten)]
        fields: CategoryFields,
    },
    /// Delete a category without children
    Delete { id: u64 },
    /// Show a category
    Get {
        id: u64,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check that products may be attached to a category
    Check { id: u64 },
    /// List enabled categories
    List {
        /// Only these IDs, whatever their status
        #[arg(long, value_delimiter = ',')]
        ids: Vec<u64>,
        /// Name contains (case-insensitive)
        #[arg(long)]
        name: Option<String>,
        /// Direct children of this parent (0 for roots)
        #[arg(long)]
        parent: Option<u64>,
    },
    /// Print the default configuration
    InitConfig,
}

#[derive(Args)]
struct CategoryFields {
    /// Display name
    #[arg(long)]
    name: Option<String>,
    /// Parent ID (0 for a root category)
    #[arg(long)]
    parent: Option<u64>,
    /// Sort key, lower first
    #[arg(long)]
    sort: Option<i32>,
    /// Picture URL
    #[arg(long)]
    pic_url: Option<String>,
    /// Description
    #[arg(long)]
    description: Option<String>,
    /// Mark the category disabled
    #[arg(long, conflicts_with = "enabled")]
    disabled: bool,
    /// Mark the category enabled
    #[arg(long)]
    enabled: bool,
}

impl CategoryFields {
    fn status(&self) -> Option<CategoryStatus> {
        if self.disabled {
            Some(CategoryStatus::Disabled)
        } else if self.enabled {
            Some(CategoryStatus::Enabled)
        } else {
            None
        }
    }

    fn into_new(self) -> Result<NewCategory> {
        let status = self.status().unwrap_or_default();
        let name = self.name.ok_or_else(|| eyre!("--name is required"))?;
        Ok(NewCategory {
            parent_id: CategoryId(self.parent.unwrap_or(0)),
            status,
            attrs: CategoryAttrs {
                name,
                pic_url: self.pic_url,
                sort: self.sort.unwrap_or(0),
                description: self.description,
            },
        })
    }

    fn apply_to(self, current: &Category) -> CategoryUpdate {
        let mut update = CategoryUpdate::from(current);
        if let Some(status) = self.status() {
            update.status = status;
        }
        if let Some(parent) = self.parent {
            update.parent_id = CategoryId(parent);
        }
        if let Some(name) = self.name {
            update.attrs.name = name;
        }
        if let Some(sort) = self.sort {
            update.attrs.sort = sort;
        }
        if self.pic_url.is_some() {
            update.attrs.pic_url = self.pic_url;
        }
        if self.description.is_some() {
            update.attrs.description = self.description;
        }
        update
    }
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn print_category(category: &Category) {
    println!("{} {}", category.id, category.attrs.name);
    if category.is_root() {
        println!("  Parent: (root)");
    } else {
        println!("  Parent: {}", category.parent_id);
    }
    println!("  Status: {}", category.status.display_name());
    println!("  Sort: {}", category.attrs.sort);
    if let Some(url) = &category.attrs.pic_url {
        println!("  Picture: {}", url);
    }
    if let Some(description) = &category.attrs.description {
        println!("  Description: {}", description);
    }
    println!(
        "  Updated: {}",
        category.updated_at.format("%Y-%m-%d %H:%M:%S")
    );
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let mut config = Config::load().wrap_err("Failed to load configuration")?;
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = dir;
    }
    init_logging(&config);

    let store = FileStore::with_config(config.storage.clone());
    tracing::debug!(path = %store.path().display(), "opening category store");
    let service = CategoryService::with_config(store, config.hierarchy);

    match cli.command {
        Commands::Create { fields } => {
            let id = service.create_category(fields.into_new()?)?;
            println!("Created category {}", id);
        }
        Commands::Update { id, fields } => {
            let id = CategoryId(id);
            let current = service
                .get_category(id)?
                .ok_or_else(|| eyre!("Category not found: {}", id))?;
            service.update_category(id, fields.apply_to(&current))?;
            println!("Updated category {}", id);
        }
        Commands::Delete { id } => {
            service.delete_category(CategoryId(id))?;
            println!("Deleted category {}", id);
        }
        Commands::Get { id, json } => match service.get_category(CategoryId(id))? {
            Some(category) if json => println!("{}", serde_json::to_string_pretty(&category)?),
            Some(category) => print_category(&category),
            None => println!("No category with ID {}", id),
        },
        Commands::Check { id } => {
            let id = CategoryId(id);
            service.assert_usable(id)?;
            println!(
                "Category {} is usable (level {})",
                id,
                service.category_level(id)?
            );
        }
        Commands::List { ids, name, parent } => {
            let categories = if !ids.is_empty() {
                let ids: Vec<CategoryId> = ids.into_iter().map(CategoryId).collect();
                service.list_enabled_by_ids(&ids)?
            } else if name.is_some() || parent.is_some() {
                let filter = CategoryFilter {
                    name,
                    parent_id: parent.map(CategoryId),
                    ..Default::default()
                };
                service.list_enabled_filtered(&filter)?
            } else {
                service.list_enabled()?
            };

            if categories.is_empty() {
                println!("No categories found. Use 'catree create --name <name>' to add one.");
            }
            for category in &categories {
                println!(
                    "{:>6}  {:>6}  {}",
                    category.id.0, category.parent_id.0, category.attrs.name
                );
            }
        }
        Commands::InitConfig => {
            print!("{}", Config::default_config_string());
        }
    }

    Ok(())
}
