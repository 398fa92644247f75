//! Integration tests for the plugin manager, using in-memory port doubles.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use scaforge_core::application::ApplicationError;
use scaforge_core::domain::DomainError;
use scaforge_core::prelude::*;

// ── Port doubles ──────────────────────────────────────────────────────────────

#[derive(Default, Clone)]
struct RecordingInstaller {
    installs: Arc<Mutex<Vec<Vec<String>>>>,
    uninstalls: Arc<Mutex<Vec<Vec<String>>>>,
    fail_for_package: Option<String>,
}

impl RecordingInstaller {
    fn failing_on(package: &str) -> Self {
        Self {
            fail_for_package: Some(package.to_string()),
            ..Default::default()
        }
    }

    fn installed_packages(&self) -> Vec<Vec<String>> {
        self.installs.lock().unwrap().clone()
    }

    fn uninstalled_packages(&self) -> Vec<Vec<String>> {
        self.uninstalls.lock().unwrap().clone()
    }
}

impl PackageInstaller for RecordingInstaller {
    fn install(&self, _root: &Path, packages: &scaforge_core::domain::PackageSet) -> ScaforgeResult<()> {
        let names = packages.all_names();
        if let Some(poison) = &self.fail_for_package {
            if names.iter().any(|n| n == poison) {
                return Err(ApplicationError::PackageManagerFailed {
                    operation: "install".into(),
                    reason: format!("registry refused {poison}"),
                }
                .into());
            }
        }
        self.installs.lock().unwrap().push(names);
        Ok(())
    }

    fn uninstall(&self, _root: &Path, names: &[String]) -> ScaforgeResult<()> {
        self.uninstalls.lock().unwrap().push(names.to_vec());
        Ok(())
    }
}

#[derive(Default, Clone)]
struct RecordingEnvStore {
    vars: Arc<Mutex<BTreeMap<String, Vec<String>>>>,
}

impl RecordingEnvStore {
    fn vars_of(&self, plugin: &str) -> Vec<String> {
        self.vars.lock().unwrap().get(plugin).cloned().unwrap_or_default()
    }
}

impl EnvVarStore for RecordingEnvStore {
    fn upsert_for_plugin(&self, _root: &Path, plugin: &str, vars: &[EnvVar]) -> ScaforgeResult<()> {
        self.vars
            .lock()
            .unwrap()
            .insert(plugin.to_string(), vars.iter().map(|v| v.name.clone()).collect());
        Ok(())
    }

    fn remove_for_plugin(&self, _root: &Path, plugin: &str) -> ScaforgeResult<Vec<String>> {
        Ok(self.vars.lock().unwrap().remove(plugin).unwrap_or_default())
    }
}

#[derive(Default, Clone)]
struct MapFileWriter {
    files: Arc<Mutex<BTreeMap<PathBuf, String>>>,
}

impl MapFileWriter {
    fn seed(&self, path: &str, content: &str) {
        self.files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), content.to_string());
    }

    fn read(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(Path::new(path)).cloned()
    }

    fn delete(&self, path: &str) {
        self.files.lock().unwrap().remove(Path::new(path));
    }

    fn paths(&self) -> Vec<PathBuf> {
        self.files.lock().unwrap().keys().cloned().collect()
    }
}

impl FileWriter for MapFileWriter {
    fn write(&self, path: &Path, content: &str, overwrite: bool) -> ScaforgeResult<()> {
        let mut files = self.files.lock().unwrap();
        if files.contains_key(path) && !overwrite {
            return Err(ApplicationError::FileExists {
                path: path.to_path_buf(),
            }
            .into());
        }
        files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}

#[derive(Default, Clone)]
struct MapConfigStore {
    saved: Arc<Mutex<Option<ScaforgeConfig>>>,
}

impl MapConfigStore {
    fn last_saved(&self) -> Option<ScaforgeConfig> {
        self.saved.lock().unwrap().clone()
    }
}

impl ConfigStore for MapConfigStore {
    fn load(&self, root: &Path) -> ScaforgeResult<ScaforgeConfig> {
        self.saved
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| {
                ApplicationError::ProjectNotFound {
                    path: root.to_path_buf(),
                }
                .into()
            })
    }

    fn save(&self, _root: &Path, config: &ScaforgeConfig) -> ScaforgeResult<()> {
        *self.saved.lock().unwrap() = Some(config.clone());
        Ok(())
    }
}

// ── Fixtures ──────────────────────────────────────────────────────────────────

fn db_plugin() -> PluginDefinition {
    PluginDefinition::builder("db")
        .display_name("Database")
        .category(PluginCategory::Database)
        .supports("nextjs")
        .supports("astro")
        .package("@prisma/client", "^6.0.0")
        .dev_package("prisma", "^6.0.0")
        .config_schema(ConfigSchema::new(vec![
            SchemaField::string("provider")
                .with_default("postgresql")
                .one_of(["postgresql", "mysql", "sqlite"]),
        ]))
        .env_var(EnvVar::new("DATABASE_URL", "Connection string").required().secret())
        .file(FileSpec::new(
            "prisma/schema.prisma",
            "datasource db { provider = \"{{options.provider}}\" }",
        ))
        .build()
        .unwrap()
}

fn auth_plugin() -> PluginDefinition {
    PluginDefinition::builder("auth")
        .display_name("Auth")
        .category(PluginCategory::Auth)
        .supports("nextjs")
        .depends_on("db")
        .package("better-auth", "^1.2.0")
        .env_var(EnvVar::new("AUTH_SECRET", "Signing secret").required().secret())
        .file(FileSpec::new("src/lib/auth.ts", "export const app = '{{config.name}}';"))
        .integration(Integration::new(
            "trpc",
            vec![FileSpec::new(
                "src/server/auth-router.ts",
                "// session router for {{config.name}}",
            )],
        ))
        .post_install("Run `npx @better-auth/cli migrate` inside {{config.name}}")
        .build()
        .unwrap()
}

fn trpc_plugin() -> PluginDefinition {
    PluginDefinition::builder("trpc")
        .display_name("tRPC")
        .category(PluginCategory::Api)
        .supports("nextjs")
        .conflicts_with("apollo")
        .file(FileSpec::new("src/server/trpc.ts", "export const t = initTRPC.create();"))
        .build()
        .unwrap()
}

fn apollo_plugin() -> PluginDefinition {
    PluginDefinition::builder("apollo")
        .display_name("Apollo")
        .category(PluginCategory::Api)
        .supports("nextjs")
        .conflicts_with("trpc")
        .file(FileSpec::new("src/server/apollo.ts", "export const server = new ApolloServer();"))
        .build()
        .unwrap()
}

struct Harness {
    manager: PluginManager,
    installer: RecordingInstaller,
    env_store: RecordingEnvStore,
    files: MapFileWriter,
    config_store: MapConfigStore,
}

fn harness(template: &str, plugins: Vec<PluginDefinition>) -> Harness {
    harness_with(template, plugins, RecordingInstaller::default())
}

fn harness_with(
    template: &str,
    plugins: Vec<PluginDefinition>,
    installer: RecordingInstaller,
) -> Harness {
    let mut registry = PluginRegistry::new();
    for plugin in plugins {
        registry.register(plugin).unwrap();
    }

    let env_store = RecordingEnvStore::default();
    let files = MapFileWriter::default();
    let config_store = MapConfigStore::default();

    let manager = PluginManager::new(
        Arc::new(registry),
        ScaforgeConfig::new("my-app", template),
        "/project",
        Box::new(installer.clone()),
        Box::new(env_store.clone()),
        Box::new(files.clone()),
        Box::new(config_store.clone()),
    );

    Harness {
        manager,
        installer,
        env_store,
        files,
        config_store,
    }
}

fn opts(pairs: &[(&str, Value)]) -> OptionMap {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

// ── Add ───────────────────────────────────────────────────────────────────────

#[test]
fn add_installs_packages_env_vars_and_files() {
    let mut h = harness("nextjs", vec![db_plugin()]);

    let outcome = h
        .manager
        .add("db", Some(opts(&[("provider", json!("sqlite"))])))
        .unwrap();

    assert!(outcome.message.contains("added successfully"));
    assert!(outcome.installed_dependencies.is_empty());
    assert!(h.manager.is_installed("db"));

    assert_eq!(
        h.installer.installed_packages(),
        vec![vec!["@prisma/client".to_string(), "prisma".to_string()]]
    );
    assert_eq!(h.env_store.vars_of("db"), vec!["DATABASE_URL"]);
    assert_eq!(
        h.files.read("/project/prisma/schema.prisma").unwrap(),
        "datasource db { provider = \"sqlite\" }"
    );

    // Resolved options are persisted with the plugin entry.
    let saved = h.config_store.last_saved().unwrap();
    assert_eq!(saved.options_of("db").unwrap()["provider"], json!("sqlite"));
}

#[test]
fn add_auto_installs_missing_dependencies_first() {
    let mut h = harness("nextjs", vec![db_plugin(), auth_plugin()]);

    let outcome = h.manager.add("auth", None).unwrap();

    assert_eq!(outcome.installed_dependencies, vec!["db"]);
    assert!(h.manager.is_installed("db"));
    assert!(h.manager.is_installed("auth"));

    // Dependency-first package installs.
    let installs = h.installer.installed_packages();
    assert_eq!(installs[0], vec!["@prisma/client", "prisma"]);
    assert_eq!(installs[1], vec!["better-auth"]);

    // The dependency got schema defaults, not the requester's options.
    let saved = h.config_store.last_saved().unwrap();
    assert_eq!(saved.options_of("db").unwrap()["provider"], json!("postgresql"));
}

#[test]
fn add_skips_already_installed_dependencies() {
    let mut h = harness("nextjs", vec![db_plugin(), auth_plugin()]);

    h.manager.add("db", None).unwrap();
    let outcome = h.manager.add("auth", None).unwrap();

    assert!(outcome.installed_dependencies.is_empty());
    assert_eq!(h.installer.installed_packages().len(), 2);
}

#[test]
fn add_unknown_plugin_fails() {
    let mut h = harness("nextjs", vec![]);

    let err = h.manager.add("ghost", None).unwrap_err();
    assert!(err.to_string().contains("not found in registry"));
    assert!(h.config_store.last_saved().is_none());
}

#[test]
fn add_rejects_unsupported_template() {
    let mut h = harness("astro", vec![trpc_plugin()]);

    let err = h.manager.add("trpc", None).unwrap_err();
    assert!(err.to_string().contains("does not support astro template"));
}

#[test]
fn add_rejects_second_install() {
    let mut h = harness("nextjs", vec![db_plugin()]);

    h.manager.add("db", None).unwrap();
    let err = h.manager.add("db", None).unwrap_err();
    assert!(err.to_string().contains("already installed"));
}

#[test]
fn add_rejects_conflicting_plugin_in_both_directions() {
    // apollo declares the conflict; adding trpc second must still fail.
    let one_sided = PluginDefinition::builder("trpc")
        .category(PluginCategory::Api)
        .supports("nextjs")
        .build()
        .unwrap();

    let mut h = harness("nextjs", vec![one_sided, apollo_plugin()]);
    h.manager.add("apollo", None).unwrap();

    let err = h.manager.add("trpc", None).unwrap_err();
    assert!(err.to_string().contains("conflicts with installed plugins"));
    assert!(err.to_string().contains("apollo"));

    // And the declared direction.
    let mut h = harness("nextjs", vec![trpc_plugin(), apollo_plugin()]);
    h.manager.add("trpc", None).unwrap();
    let err = h.manager.add("apollo", None).unwrap_err();
    assert!(err.to_string().contains("conflicts with installed plugins"));
}

#[test]
fn add_rejects_schema_violations_before_any_side_effect() {
    let mut h = harness("nextjs", vec![db_plugin()]);

    let err = h
        .manager
        .add("db", Some(opts(&[("provider", json!("oracle"))])))
        .unwrap_err();

    match err {
        ScaforgeError::Domain(DomainError::SchemaValidation { plugin, .. }) => {
            assert_eq!(plugin, "db");
        }
        other => panic!("expected schema violation, got {other}"),
    }
    assert!(!h.manager.is_installed("db"));
    assert!(h.installer.installed_packages().is_empty());
    assert!(h.files.paths().is_empty());
}

#[test]
fn add_reports_template_syntax_errors_with_plugin_and_path() {
    let broken = PluginDefinition::builder("broken")
        .category(PluginCategory::Api)
        .supports("nextjs")
        .file(FileSpec::new("src/broken.ts", "{{#if options.x}}no close"))
        .build()
        .unwrap();
    let mut h = harness("nextjs", vec![broken]);

    let err = h.manager.add("broken", None).unwrap_err();
    match err {
        ScaforgeError::Domain(DomainError::TemplateSyntax { plugin, path, .. }) => {
            assert_eq!(plugin, "broken");
            assert_eq!(path, "src/broken.ts");
        }
        other => panic!("expected template syntax error, got {other}"),
    }
    assert!(!h.manager.is_installed("broken"));
}

#[test]
fn add_detects_dependency_cycles() {
    let a = PluginDefinition::builder("a")
        .category(PluginCategory::Api)
        .supports("nextjs")
        .depends_on("b")
        .build()
        .unwrap();
    let b = PluginDefinition::builder("b")
        .category(PluginCategory::Api)
        .supports("nextjs")
        .depends_on("a")
        .build()
        .unwrap();
    let mut h = harness("nextjs", vec![a, b]);

    let err = h.manager.add("a", None).unwrap_err();
    match err {
        ScaforgeError::Domain(DomainError::CyclicDependency { chain }) => {
            assert_eq!(chain, vec!["a", "b", "a"]);
        }
        other => panic!("expected cycle error, got {other}"),
    }
}

#[test]
fn add_fails_when_a_dependency_does_not_support_the_template() {
    let astro_db = PluginDefinition::builder("astro-db")
        .category(PluginCategory::Database)
        .supports("astro")
        .package("astro-db", "^1.0.0")
        .build()
        .unwrap();
    let portal = PluginDefinition::builder("portal")
        .category(PluginCategory::Auth)
        .supports("nextjs")
        .supports("astro")
        .depends_on("astro-db")
        .build()
        .unwrap();
    let mut h = harness("nextjs", vec![astro_db, portal]);

    let err = h.manager.add("portal", None).unwrap_err();
    assert!(err.to_string().contains("'astro-db' does not support nextjs template"));

    // Nothing was installed: not the dependency, not the requested plugin.
    assert!(!h.manager.is_installed("astro-db"));
    assert!(!h.manager.is_installed("portal"));
    assert!(h.installer.installed_packages().is_empty());
    assert!(h.config_store.last_saved().is_none());
}

#[test]
fn add_skips_files_restricted_to_other_templates() {
    let plugin = PluginDefinition::builder("multi")
        .category(PluginCategory::Api)
        .supports("nextjs")
        .supports("astro")
        .file(FileSpec::new("next.ts", "next").only_for("nextjs"))
        .file(FileSpec::new("astro.ts", "astro").only_for("astro"))
        .build()
        .unwrap();
    let mut h = harness("nextjs", vec![plugin]);

    h.manager.add("multi", None).unwrap();

    assert!(h.files.read("/project/next.ts").is_some());
    assert!(h.files.read("/project/astro.ts").is_none());
}

#[test]
fn add_refuses_to_overwrite_existing_files() {
    let mut h = harness("nextjs", vec![db_plugin()]);
    h.files.seed("/project/prisma/schema.prisma", "hand-written");

    let err = h.manager.add("db", None).unwrap_err();
    assert!(err.to_string().contains("already exists"));
    assert_eq!(h.files.read("/project/prisma/schema.prisma").unwrap(), "hand-written");
    assert!(!h.manager.is_installed("db"));
}

#[test]
fn add_overwrites_when_the_spec_allows_it() {
    let plugin = PluginDefinition::builder("layout")
        .category(PluginCategory::Api)
        .supports("nextjs")
        .file(FileSpec::new("src/app/layout.tsx", "new layout").overwriting())
        .build()
        .unwrap();
    let mut h = harness("nextjs", vec![plugin]);
    h.files.seed("/project/src/app/layout.tsx", "skeleton layout");

    h.manager.add("layout", None).unwrap();
    assert_eq!(h.files.read("/project/src/app/layout.tsx").unwrap(), "new layout");
}

#[test]
fn add_renders_templated_destination_paths() {
    let plugin = PluginDefinition::builder("gen")
        .category(PluginCategory::Api)
        .supports("nextjs")
        .config_schema(ConfigSchema::new(vec![
            SchemaField::string("dir").with_default("lib"),
        ]))
        .file(FileSpec::new("src/{{options.dir}}/client.ts", "client"))
        .build()
        .unwrap();
    let mut h = harness("nextjs", vec![plugin]);

    h.manager
        .add("gen", Some(opts(&[("dir", json!("services"))])))
        .unwrap();

    assert!(h.files.read("/project/src/services/client.ts").is_some());
}

#[test]
fn add_renders_post_install_notes() {
    let mut h = harness("nextjs", vec![db_plugin(), auth_plugin()]);

    let outcome = h.manager.add("auth", None).unwrap();
    assert_eq!(
        outcome.post_install,
        vec!["Run `npx @better-auth/cli migrate` inside my-app"]
    );
}

#[test]
fn add_emits_integration_files_when_added_second() {
    // auth owns an integration targeting trpc; trpc is installed first.
    let mut h = harness("nextjs", vec![db_plugin(), auth_plugin(), trpc_plugin()]);

    h.manager.add("trpc", None).unwrap();
    h.manager.add("auth", None).unwrap();

    assert!(h.files.read("/project/src/server/auth-router.ts").is_some());
}

#[test]
fn add_emits_integration_files_from_the_installed_side() {
    // auth installed first; its integration fires when trpc arrives.
    let mut h = harness("nextjs", vec![db_plugin(), auth_plugin(), trpc_plugin()]);

    h.manager.add("auth", None).unwrap();
    assert!(h.files.read("/project/src/server/auth-router.ts").is_none());

    h.manager.add("trpc", None).unwrap();
    assert!(h.files.read("/project/src/server/auth-router.ts").is_some());
}

#[test]
fn add_skips_integration_when_partner_absent() {
    let mut h = harness("nextjs", vec![db_plugin(), auth_plugin()]);

    h.manager.add("auth", None).unwrap();
    assert!(h.files.read("/project/src/server/auth-router.ts").is_none());
}

#[test]
fn add_persists_completed_dependencies_despite_later_failure() {
    let installer = RecordingInstaller::failing_on("better-auth");
    let mut h = harness_with("nextjs", vec![db_plugin(), auth_plugin()], installer);

    let err = h.manager.add("auth", None).unwrap_err();
    assert!(err.to_string().contains("better-auth"));

    // db completed before the failure and stays installed and persisted.
    assert!(h.manager.is_installed("db"));
    assert!(!h.manager.is_installed("auth"));
    let saved = h.config_store.last_saved().unwrap();
    assert!(saved.is_installed("db"));
    assert!(!saved.is_installed("auth"));
}

// ── Remove ────────────────────────────────────────────────────────────────────

#[test]
fn remove_uninstalls_packages_and_env_vars() {
    let mut h = harness("nextjs", vec![db_plugin()]);
    h.manager.add("db", None).unwrap();

    let outcome = h.manager.remove("db").unwrap();

    assert!(outcome.message.contains("removed successfully"));
    assert_eq!(outcome.removed_env_vars, vec!["DATABASE_URL"]);
    assert!(!h.manager.is_installed("db"));
    assert_eq!(
        h.installer.uninstalled_packages(),
        vec![vec!["@prisma/client".to_string(), "prisma".to_string()]]
    );
    assert!(!h.config_store.last_saved().unwrap().is_installed("db"));
}

#[test]
fn remove_rejects_plugins_that_are_not_installed() {
    let mut h = harness("nextjs", vec![db_plugin()]);

    let err = h.manager.remove("db").unwrap_err();
    assert!(err.to_string().contains("not installed"));
}

#[test]
fn remove_is_blocked_while_dependents_remain() {
    let mut h = harness("nextjs", vec![db_plugin(), auth_plugin()]);
    h.manager.add("auth", None).unwrap();

    let err = h.manager.remove("db").unwrap_err();
    assert_eq!(err.to_string(), "Cannot remove \"db\": required by auth");
    assert!(h.manager.is_installed("db"));

    // Dependent-first order succeeds, and never cascades.
    h.manager.remove("auth").unwrap();
    assert!(h.manager.is_installed("db"));
    h.manager.remove("db").unwrap();
    assert!(h.manager.installed().is_empty());
}

#[test]
fn remove_then_re_add_takes_fresh_options() {
    let mut h = harness("nextjs", vec![db_plugin()]);

    h.manager
        .add("db", Some(opts(&[("provider", json!("mysql"))])))
        .unwrap();
    h.manager.remove("db").unwrap();
    h.files.delete("/project/prisma/schema.prisma"); // file removal is manual
    h.manager
        .add("db", Some(opts(&[("provider", json!("sqlite"))])))
        .unwrap();

    let saved = h.config_store.last_saved().unwrap();
    assert_eq!(saved.options_of("db").unwrap()["provider"], json!("sqlite"));
}

// ── Validation reports ────────────────────────────────────────────────────────

#[test]
fn validate_add_passes_for_a_clean_request() {
    let h = harness("nextjs", vec![db_plugin()]);
    let report = h.manager.validate_add("db");
    assert!(report.valid);
    assert!(report.errors.is_empty());
}

#[test]
fn validate_add_collects_all_applicable_errors() {
    let drizzle = PluginDefinition::builder("drizzle")
        .category(PluginCategory::Database)
        .supports("nextjs")
        .conflicts_with("db")
        .build()
        .unwrap();
    let mut h = harness("astro", vec![db_plugin(), drizzle]);
    h.manager.add("db", None).unwrap();

    // Wrong template AND a conflict, reported together.
    let report = h.manager.validate_add("drizzle");
    assert!(!report.valid);
    assert_eq!(report.errors.len(), 2);
    assert!(report.errors.iter().any(|e| e.contains("does not support astro")));
    assert!(report.errors.iter().any(|e| e.contains("conflicts with installed plugins")));
}

#[test]
fn validate_add_reports_unknown_plugin_only() {
    let h = harness("astro", vec![]);
    let report = h.manager.validate_add("ghost");
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("not found in registry"));
}

#[test]
fn validate_remove_reports_dependents() {
    let mut h = harness("nextjs", vec![db_plugin(), auth_plugin()]);
    h.manager.add("auth", None).unwrap();

    let report = h.manager.validate_remove("db");
    assert!(!report.valid);
    assert!(report.errors[0].contains("required by auth"));

    let report = h.manager.validate_remove("auth");
    assert!(report.valid);
}
