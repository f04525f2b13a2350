//! CLI runner - executes commands

use crate::catalog::{list_builtin, load_catalog, Phase, StatementCatalog};
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::cloud::{load_sdk_config, ClusterApi, IamRoles, RedshiftClusters, RoleApi};
use crate::config::DwhConfig;
use crate::database::{SqlExecutor, Warehouse};
use crate::error::{Result, ResultExt};
use crate::provision::{persist, PlannedAction, Poller, Provisioner};
use crate::statements::{run_all, run_quality_checks, CheckReport};
use crate::types::Row;
use serde_json::{json, Value};
use std::path::Path;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Up { dry_run } => self.up(*dry_run).await,
            Commands::Down { dry_run } => self.down(*dry_run).await,
            Commands::Status => self.status().await,
            Commands::CreateTables { local } => self.create_tables(local.as_deref()).await,
            Commands::Etl { local } => self.etl(local.as_deref()).await,
            Commands::Check { local } => self.check(local.as_deref()).await,
            Commands::Catalogs => self.list_catalogs(),
        }
    }

    /// Load configuration
    fn load_config(&self) -> Result<DwhConfig> {
        DwhConfig::load(&self.cli.config)
    }

    /// Load the statement catalog
    fn load_catalog(&self) -> Result<StatementCatalog> {
        load_catalog(&self.cli.catalog)
    }

    // ========================================================================
    // Provisioning
    // ========================================================================

    /// Ensure role and cluster, wait for the cluster, save its endpoint
    async fn up(&self, dry_run: bool) -> Result<()> {
        let config = self.load_config()?;
        let sdk_config = load_sdk_config(&config.cluster.region).await;
        let clusters = RedshiftClusters::new(&sdk_config);
        let roles = IamRoles::new(&sdk_config);
        self.up_with(config, &clusters, &roles, dry_run).await
    }

    /// `up` against the given cloud surfaces
    pub(crate) async fn up_with<C, R>(
        &self,
        mut config: DwhConfig,
        clusters: &C,
        roles: &R,
        dry_run: bool,
    ) -> Result<()>
    where
        C: ClusterApi + ?Sized,
        R: RoleApi + ?Sized,
    {
        let poller = Poller::from_config(&config.polling());
        let provisioner = Provisioner::new(&config, clusters, roles, poller);

        if dry_run {
            let plan = provisioner.plan_provision().await?;
            self.output_plan(&plan);
            return Ok(());
        }

        let provisioned = match provisioner.provision().await {
            Ok(provisioned) => provisioned,
            Err(e) => {
                if e.is_terminal_cluster_state() {
                    warn!(
                        "Cluster {} will not become available; inspect it with `dwh-etl status` or remove it with `dwh-etl down`",
                        config.cluster.identifier
                    );
                }
                return Err(e);
            }
        };

        info!(
            role = %provisioned.role_outcome,
            cluster = %provisioned.cluster_outcome,
            "Provisioning complete"
        );
        if provisioned.cluster_outcome.is_created() {
            info!("New cluster {} created", config.cluster.identifier);
        }

        persist(&mut config, &provisioned.cluster, &self.cli.config).with_context(|| {
            format!("Failed to save connection values to {}", self.cli.config.display())
        })?;
        info!("Saved connection values to {}", self.cli.config.display());
        info!("Cluster is running");
        Ok(())
    }

    /// Delete cluster and role
    async fn down(&self, dry_run: bool) -> Result<()> {
        let config = self.load_config()?;
        let sdk_config = load_sdk_config(&config.cluster.region).await;
        let clusters = RedshiftClusters::new(&sdk_config);
        let roles = IamRoles::new(&sdk_config);
        let poller = Poller::from_config(&config.polling());
        let provisioner = Provisioner::new(&config, &clusters, &roles, poller);

        if dry_run {
            let plan = provisioner.plan_teardown().await?;
            self.output_plan(&plan);
            return Ok(());
        }

        provisioner.teardown().await
    }

    /// Show cluster and role state
    async fn status(&self) -> Result<()> {
        let config = self.load_config()?;
        let sdk_config = load_sdk_config(&config.cluster.region).await;
        let clusters = RedshiftClusters::new(&sdk_config);
        let roles = IamRoles::new(&sdk_config);
        let provisioner = Provisioner::new(&config, &clusters, &roles, Poller::default());

        let status = provisioner.status().await?;
        self.output_message(&json!({
            "type": "STATUS",
            "cluster_identifier": config.cluster.identifier,
            "role_name": config.iam_role.name,
            "status": status
        }));
        Ok(())
    }

    // ========================================================================
    // Pipeline
    // ========================================================================

    /// Drop and recreate all tables
    async fn create_tables(&self, local: Option<&Path>) -> Result<()> {
        let config = self.load_config()?;
        let catalog = self.load_catalog()?;
        let ctx = config.template_context();

        let drops = catalog.render(Phase::DropTables, &ctx)?;
        let creates = catalog.render(Phase::CreateTables, &ctx)?;

        let mut warehouse = Warehouse::connect(&config, local).await?;
        run_all(&drops, &mut warehouse).await?;
        let created = run_all(&creates, &mut warehouse).await?;
        info!(tables = created, "Tables created on {}", warehouse.target());
        warehouse.close().await
    }

    /// Load staging tables, then insert into the star schema
    async fn etl(&self, local: Option<&Path>) -> Result<()> {
        let config = self.load_config()?;
        let catalog = self.load_catalog()?;
        let ctx = config.template_context();

        let copies = catalog.render(Phase::CopyTables, &ctx)?;
        let inserts = catalog.render(Phase::InsertTables, &ctx)?;

        let mut warehouse = Warehouse::connect(&config, local).await?;
        run_all(&copies, &mut warehouse).await?;
        info!("Staging tables loaded");
        let inserted = run_all(&inserts, &mut warehouse).await?;
        info!(statements = inserted, "Star schema tables loaded");
        warehouse.close().await
    }

    /// Run the quality checks, printing rows as each one passes
    async fn check(&self, local: Option<&Path>) -> Result<()> {
        let config = self.load_config()?;
        let catalog = self.load_catalog()?;
        let checks = catalog.render(Phase::QualityChecks, &config.template_context())?;

        let mut warehouse = Warehouse::connect(&config, local).await?;
        for check in &checks {
            for report in run_quality_checks(std::slice::from_ref(check), &mut warehouse).await? {
                self.output_check(&report);
            }
        }
        info!(checks = checks.len(), "All quality checks returned rows");
        warehouse.close().await
    }

    /// List built-in catalogs
    fn list_catalogs(&self) -> Result<()> {
        let catalogs = list_builtin()
            .into_iter()
            .map(|name| -> Result<Value> {
                let catalog = load_catalog(name)?;
                let counts: serde_json::Map<String, Value> = Phase::ALL
                    .iter()
                    .map(|phase| (phase.key().to_string(), json!(catalog.statements(*phase).len())))
                    .collect();
                Ok(json!({
                    "name": catalog.name,
                    "description": catalog.description,
                    "statements": counts
                }))
            })
            .collect::<Result<Vec<Value>>>()?;

        self.output_message(&json!({
            "type": "CATALOGS",
            "catalogs": catalogs
        }));
        Ok(())
    }

    // ========================================================================
    // Output
    // ========================================================================

    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }

    fn output_plan(&self, plan: &[PlannedAction]) {
        for action in plan {
            info!("Dry run: would {action}");
        }
        self.output_message(&json!({
            "type": "PLAN",
            "actions": plan
        }));
    }

    fn output_check(&self, report: &CheckReport) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(report).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                for row in &report.rows {
                    println!("{}", format_row(row));
                }
                println!("{}", "-".repeat(10));
            }
        }
    }
}

/// Render a row as a parenthesized, comma separated tuple
pub(crate) fn format_row(row: &Row) -> String {
    let cells: Vec<&str> = row
        .iter()
        .map(|cell| cell.as_deref().unwrap_or("NULL"))
        .collect();
    format!("({})", cells.join(", "))
}
