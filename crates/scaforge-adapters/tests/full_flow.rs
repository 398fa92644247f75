//! End-to-end flows: built-in catalog + memory adapters + plugin manager.

use std::path::Path;
use std::sync::Arc;

use serde_json::json;

use scaforge_adapters::{
    MemoryConfigStore, MemoryEnvStore, MemoryFileWriter, MemoryInstaller, register_builtins,
    installer::InstallerCall,
};
use scaforge_core::domain::{OptionMap, PluginRegistry, ScaforgeConfig};
use scaforge_core::prelude::PluginManager;

struct World {
    manager: PluginManager,
    installer: MemoryInstaller,
    env_store: MemoryEnvStore,
    files: MemoryFileWriter,
    config_store: MemoryConfigStore,
}

fn world(template: &str) -> World {
    let mut registry = PluginRegistry::new();
    register_builtins(&mut registry).unwrap();

    let installer = MemoryInstaller::new();
    let env_store = MemoryEnvStore::new();
    let files = MemoryFileWriter::new();
    let config_store = MemoryConfigStore::new();

    let manager = PluginManager::new(
        Arc::new(registry),
        ScaforgeConfig::new("demo-app", template),
        "/demo-app",
        Box::new(installer.clone()),
        Box::new(env_store.clone()),
        Box::new(files.clone()),
        Box::new(config_store.clone()),
    );

    World {
        manager,
        installer,
        env_store,
        files,
        config_store,
    }
}

fn opts(pairs: &[(&str, serde_json::Value)]) -> OptionMap {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

#[test]
fn add_prisma_renders_schema_with_chosen_provider() {
    let mut w = world("nextjs");

    let outcome = w
        .manager
        .add("prisma", Some(opts(&[("provider", json!("sqlite"))])))
        .unwrap();

    assert!(outcome.message.contains("added successfully"));
    let schema = w
        .files
        .read_file(Path::new("/demo-app/prisma/schema.prisma"))
        .unwrap();
    assert!(schema.contains("provider = \"sqlite\""));
    assert!(schema.contains("// Prisma schema for demo-app"));
    // better-auth is not installed, so its model block is absent.
    assert!(!schema.contains("model Session"));

    assert_eq!(w.env_store.names_of("prisma"), vec!["DATABASE_URL"]);
    assert_eq!(
        w.installer.calls(),
        vec![InstallerCall::Install(vec![
            "@prisma/client".to_string(),
            "prisma".to_string()
        ])]
    );
}

#[test]
fn add_better_auth_pulls_in_prisma_first() {
    let mut w = world("nextjs");

    let outcome = w.manager.add("better-auth", None).unwrap();

    assert_eq!(outcome.installed_dependencies, vec!["prisma"]);
    assert!(w.manager.is_installed("prisma"));
    assert!(w.manager.is_installed("better-auth"));

    // Both post-install notes arrive, dependency first.
    assert_eq!(outcome.post_install.len(), 2);
    assert!(outcome.post_install[0].contains("prisma migrate"));
    assert!(outcome.post_install[1].contains("better-auth/cli migrate"));

    // Auth route is Next.js-only and this is a Next.js project.
    assert!(w.files.exists(Path::new("/demo-app/src/app/api/auth/[...all]/route.ts")));

    let saved = w.config_store.current().unwrap();
    assert_eq!(saved.installed(), vec!["better-auth", "prisma"]);
    // The dependency got its own schema defaults.
    assert_eq!(saved.options_of("prisma").unwrap()["provider"], json!("postgresql"));
}

#[test]
fn trpc_and_better_auth_integrate_in_either_order() {
    let router = Path::new("/demo-app/src/server/routers/auth.ts");

    // auth first, trpc second
    let mut w = world("nextjs");
    w.manager.add("better-auth", None).unwrap();
    assert!(!w.files.exists(router));
    w.manager.add("trpc", None).unwrap();
    assert!(w.files.exists(router));

    // trpc rendered with better-auth already installed, so its init file
    // carries the protected procedure.
    let init = w.files.read_file(Path::new("/demo-app/src/server/trpc.ts")).unwrap();
    assert!(init.contains("protectedProcedure"));

    // trpc first, auth second
    let mut w = world("nextjs");
    w.manager.add("trpc", None).unwrap();
    w.manager.add("better-auth", None).unwrap();
    assert!(w.files.exists(router));
}

#[test]
fn trpc_init_omits_auth_glue_without_better_auth() {
    let mut w = world("nextjs");
    w.manager.add("trpc", None).unwrap();

    let init = w.files.read_file(Path::new("/demo-app/src/server/trpc.ts")).unwrap();
    assert!(!init.contains("protectedProcedure"));
}

#[test]
fn apollo_and_trpc_cannot_coexist() {
    let mut w = world("nextjs");
    w.manager.add("apollo", None).unwrap();

    let err = w.manager.add("trpc", None).unwrap_err();
    assert!(err.to_string().contains("conflicts with installed plugins: apollo"));
}

#[test]
fn nextjs_only_files_are_skipped_on_astro() {
    let mut w = world("astro");
    w.manager.add("stripe", None).unwrap();

    assert!(w.files.exists(Path::new("/demo-app/src/lib/stripe.ts")));
    assert!(!w.files.exists(Path::new("/demo-app/src/app/api/webhooks/stripe/route.ts")));
}

#[test]
fn removal_respects_dependents_and_cleans_up() {
    let mut w = world("nextjs");
    w.manager.add("better-auth", None).unwrap();

    let err = w.manager.remove("prisma").unwrap_err();
    assert_eq!(err.to_string(), "Cannot remove \"prisma\": required by better-auth");

    w.manager.remove("better-auth").unwrap();
    let outcome = w.manager.remove("prisma").unwrap();
    assert_eq!(outcome.removed_env_vars, vec!["DATABASE_URL"]);
    assert!(w.manager.installed().is_empty());

    let uninstalls: Vec<_> = w
        .installer
        .calls()
        .into_iter()
        .filter(|c| matches!(c, InstallerCall::Uninstall(_)))
        .collect();
    assert_eq!(uninstalls.len(), 2);
}

#[test]
fn resend_works_on_every_supported_template() {
    for template in ["nextjs", "astro", "sveltekit"] {
        let mut w = world(template);
        w.manager
            .add("resend", Some(opts(&[("from", json!("hello@demo.dev"))])))
            .unwrap();
        let client = w.files.read_file(Path::new("/demo-app/src/lib/email.ts")).unwrap();
        assert!(client.contains("from: 'hello@demo.dev'"));
    }
}

#[test]
fn better_auth_is_nextjs_only() {
    let mut w = world("astro");
    let err = w.manager.add("better-auth", None).unwrap_err();
    assert!(err.to_string().contains("does not support astro template"));
}
