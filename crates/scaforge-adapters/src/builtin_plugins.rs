//! Built-in plugin catalog.
//!
//! [`register_builtins`] is the single entry-point for loading the plugins
//! that ship with Scaforge.  Each definition bundles packages, environment
//! variables, rendered files, and integrations for one feature:
//!
//! | Plugin        | Category | Notes                                    |
//! |---------------|----------|------------------------------------------|
//! | `prisma`      | database | provider option: postgresql/mysql/sqlite |
//! | `better-auth` | auth     | depends on `prisma`, integrates `trpc`   |
//! | `trpc`        | api      | conflicts with `apollo`                  |
//! | `apollo`      | api      | conflicts with `trpc`                    |
//! | `stripe`      | payments | webhook handler is Next.js-only          |
//! | `resend`      | email    |                                          |
//!
//! File bodies are template strings in the conditional micro-language; they
//! render at add-time against the project's resolved options.

use tracing::{debug, instrument};

use scaforge_core::domain::{
    ConfigSchema, DomainError, EnvVar, FileSpec, Integration, PluginCategory, PluginDefinition,
    PluginRegistry, SchemaField,
};

// ── Template bodies ───────────────────────────────────────────────────────────

const PRISMA_SCHEMA: &str = r#"// Prisma schema for {{config.name}}

generator client {
  provider = "prisma-client-js"
}

datasource db {
  provider = "{{options.provider}}"
  url      = env("DATABASE_URL")
}

model User {
  id        String   @id @default(cuid())
  email     String   @unique
  createdAt DateTime @default(now())
{{#if hasPlugin('better-auth')}}
  sessions  Session[]
{{/if}}
}
{{#if hasPlugin('better-auth')}}

model Session {
  id     String @id @default(cuid())
  userId String
  user   User   @relation(fields: [userId], references: [id])
}
{{/if}}
"#;

const PRISMA_CLIENT: &str = r#"import { PrismaClient } from '@prisma/client';

const globalForPrisma = globalThis as unknown as { prisma: PrismaClient };

export const prisma =
  globalForPrisma.prisma ??
  new PrismaClient({
{{#if eq(options.provider, 'sqlite')}}
    log: ['warn', 'error'],
{{else}}
    log: ['query', 'warn', 'error'],
{{/if}}
  });

if (process.env.NODE_ENV !== 'production') globalForPrisma.prisma = prisma;
"#;

const BETTER_AUTH_CONFIG: &str = r#"import { betterAuth } from 'better-auth';
import { prismaAdapter } from 'better-auth/adapters/prisma';
import { prisma } from './prisma';

export const auth = betterAuth({
  appName: '{{config.name}}',
  database: prismaAdapter(prisma, { provider: '{{options.provider}}' }),
  emailAndPassword: {
    enabled: {{options.emailAndPassword}},
  },
{{#if options.socialProviders}}
  socialProviders: {
    github: {
      clientId: process.env.GITHUB_CLIENT_ID!,
      clientSecret: process.env.GITHUB_CLIENT_SECRET!,
    },
  },
{{/if}}
});
"#;

const BETTER_AUTH_ROUTE: &str = r#"import { auth } from '@/lib/auth';
import { toNextJsHandler } from 'better-auth/next-js';

export const { GET, POST } = toNextJsHandler(auth.handler);
"#;

const BETTER_AUTH_TRPC_ROUTER: &str = r#"import { router, protectedProcedure } from '../trpc';

export const authRouter = router({
  session: protectedProcedure.query(({ ctx }) => ctx.session),
});
"#;

const TRPC_INIT: &str = r#"import { initTRPC, TRPCError } from '@trpc/server';
import superjson from 'superjson';

const t = initTRPC.context<Context>().create({ transformer: superjson });

export const router = t.router;
export const publicProcedure = t.procedure;
{{#if hasPlugin('better-auth')}}
export const protectedProcedure = t.procedure.use(({ ctx, next }) => {
  if (!ctx.session) throw new TRPCError({ code: 'UNAUTHORIZED' });
  return next({ ctx: { ...ctx, session: ctx.session } });
});
{{/if}}

export interface Context {
{{#if hasPlugin('better-auth')}}
  session: unknown | null;
{{/if}}
}
"#;

const TRPC_ROOT_ROUTER: &str = r#"import { router } from './trpc';

export const appRouter = router({});

export type AppRouter = typeof appRouter;
"#;

const APOLLO_SERVER: &str = r#"import { ApolloServer } from '@apollo/server';
import { startServerAndCreateNextHandler } from '@as-integrations/next';

const typeDefs = `#graphql
  type Query {
    project: String!
  }
`;

const resolvers = {
  Query: {
    project: () => '{{config.name}}',
  },
};

const server = new ApolloServer({ typeDefs, resolvers });

export default startServerAndCreateNextHandler(server);
"#;

const STRIPE_CLIENT: &str = r#"import Stripe from 'stripe';

export const stripe = new Stripe(process.env.STRIPE_SECRET_KEY!, {
  apiVersion: '2025-02-24.acacia',
  appInfo: { name: '{{config.name}}' },
});
"#;

const STRIPE_WEBHOOK: &str = r#"import { stripe } from '@/lib/stripe';
import { headers } from 'next/headers';

export async function POST(req: Request) {
  const body = await req.text();
  const signature = (await headers()).get('stripe-signature')!;

  const event = stripe.webhooks.constructEvent(
    body,
    signature,
    process.env.STRIPE_WEBHOOK_SECRET!,
  );

  switch (event.type) {
    default:
      break;
  }

  return Response.json({ received: true });
}
"#;

const RESEND_CLIENT: &str = r#"import { Resend } from 'resend';

export const resend = new Resend(process.env.RESEND_API_KEY);

export async function sendMail(to: string, subject: string, html: string) {
  return resend.emails.send({
    from: '{{options.from}}',
    to,
    subject,
    html,
  });
}
"#;

// ── Definitions ───────────────────────────────────────────────────────────────

fn prisma() -> Result<PluginDefinition, DomainError> {
    PluginDefinition::builder("prisma")
        .display_name("Prisma")
        .category(PluginCategory::Database)
        .description("Type-safe database client and schema management")
        .version("6.4.0")
        .supports("nextjs")
        .supports("astro")
        .supports("sveltekit")
        .package("@prisma/client", "^6.4.0")
        .dev_package("prisma", "^6.4.0")
        .config_schema(ConfigSchema::new(vec![
            SchemaField::string("provider")
                .describe("Database provider")
                .with_default("postgresql")
                .one_of(["postgresql", "mysql", "sqlite"]),
        ]))
        .env_var(
            EnvVar::new("DATABASE_URL", "Database connection string")
                .required()
                .secret(),
        )
        .file(FileSpec::new("prisma/schema.prisma", PRISMA_SCHEMA))
        .file(FileSpec::new("src/lib/prisma.ts", PRISMA_CLIENT))
        .post_install("Run `npx prisma migrate dev` to create your {{options.provider}} database")
        .build()
}

fn better_auth() -> Result<PluginDefinition, DomainError> {
    PluginDefinition::builder("better-auth")
        .display_name("Better Auth")
        .category(PluginCategory::Auth)
        .description("Authentication with sessions, email/password and social providers")
        .version("1.2.0")
        .supports("nextjs")
        .depends_on("prisma")
        .package("better-auth", "^1.2.0")
        .config_schema(ConfigSchema::new(vec![
            SchemaField::string("provider")
                .describe("Database provider used by the Prisma adapter")
                .with_default("postgresql")
                .one_of(["postgresql", "mysql", "sqlite"]),
            SchemaField::boolean("emailAndPassword")
                .describe("Enable email/password sign-in")
                .with_default(true),
            SchemaField::boolean("socialProviders")
                .describe("Scaffold GitHub social sign-in")
                .with_default(false),
        ]))
        .env_var(
            EnvVar::new("BETTER_AUTH_SECRET", "Session signing secret")
                .required()
                .secret(),
        )
        .env_var(
            EnvVar::new("BETTER_AUTH_URL", "Base URL of the app")
                .with_default("http://localhost:3000"),
        )
        .file(FileSpec::new("src/lib/auth.ts", BETTER_AUTH_CONFIG))
        .file(
            FileSpec::new("src/app/api/auth/[...all]/route.ts", BETTER_AUTH_ROUTE)
                .only_for("nextjs"),
        )
        .integration(Integration::new(
            "trpc",
            vec![FileSpec::new(
                "src/server/routers/auth.ts",
                BETTER_AUTH_TRPC_ROUTER,
            )],
        ))
        .post_install("Run `npx @better-auth/cli migrate` to create the auth tables")
        .build()
}

fn trpc() -> Result<PluginDefinition, DomainError> {
    PluginDefinition::builder("trpc")
        .display_name("tRPC")
        .category(PluginCategory::Api)
        .description("End-to-end typesafe API layer")
        .version("11.0.0")
        .supports("nextjs")
        .conflicts_with("apollo")
        .package("@trpc/server", "^11.0.0")
        .package("@trpc/client", "^11.0.0")
        .package("superjson", "^2.2.0")
        .file(FileSpec::new("src/server/trpc.ts", TRPC_INIT))
        .file(FileSpec::new("src/server/routers/_app.ts", TRPC_ROOT_ROUTER))
        .build()
}

fn apollo() -> Result<PluginDefinition, DomainError> {
    PluginDefinition::builder("apollo")
        .display_name("Apollo GraphQL")
        .category(PluginCategory::Api)
        .description("GraphQL server with schema-first resolvers")
        .version("4.11.0")
        .supports("nextjs")
        .conflicts_with("trpc")
        .package("@apollo/server", "^4.11.0")
        .package("@as-integrations/next", "^3.2.0")
        .package("graphql", "^16.10.0")
        .file(
            FileSpec::new("src/app/api/graphql/route.ts", APOLLO_SERVER).only_for("nextjs"),
        )
        .build()
}

fn stripe() -> Result<PluginDefinition, DomainError> {
    PluginDefinition::builder("stripe")
        .display_name("Stripe")
        .category(PluginCategory::Payments)
        .description("Payments, subscriptions and webhooks")
        .version("17.6.0")
        .supports("nextjs")
        .supports("astro")
        .package("stripe", "^17.6.0")
        .env_var(EnvVar::new("STRIPE_SECRET_KEY", "Stripe API secret key").required().secret())
        .env_var(EnvVar::new("STRIPE_WEBHOOK_SECRET", "Webhook signing secret").secret())
        .file(FileSpec::new("src/lib/stripe.ts", STRIPE_CLIENT))
        .file(
            FileSpec::new("src/app/api/webhooks/stripe/route.ts", STRIPE_WEBHOOK)
                .only_for("nextjs"),
        )
        .post_install("Forward webhooks locally with `stripe listen --forward-to localhost:3000/api/webhooks/stripe`")
        .build()
}

fn resend() -> Result<PluginDefinition, DomainError> {
    PluginDefinition::builder("resend")
        .display_name("Resend")
        .category(PluginCategory::Email)
        .description("Transactional email")
        .version("4.1.0")
        .supports("nextjs")
        .supports("astro")
        .supports("sveltekit")
        .package("resend", "^4.1.0")
        .config_schema(ConfigSchema::new(vec![
            SchemaField::string("from")
                .describe("Default sender address")
                .with_default("onboarding@resend.dev"),
        ]))
        .env_var(EnvVar::new("RESEND_API_KEY", "Resend API key").required().secret())
        .file(FileSpec::new("src/lib/email.ts", RESEND_CLIENT))
        .build()
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Register every built-in plugin into `registry`.
///
/// Fails only on a programming error in the catalog itself (an invalid
/// definition or a duplicate name).
#[instrument(skip_all)]
pub fn register_builtins(registry: &mut PluginRegistry) -> Result<(), DomainError> {
    for definition in [
        prisma()?,
        better_auth()?,
        trpc()?,
        apollo()?,
        stripe()?,
        resend()?,
    ] {
        debug!(plugin = %definition.name, "registering built-in plugin");
        registry.register(definition)?;
    }
    Ok(())
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_builtins_register_cleanly() {
        let mut registry = PluginRegistry::new();
        register_builtins(&mut registry).unwrap();
        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn catalog_cross_references_resolve() {
        let mut registry = PluginRegistry::new();
        register_builtins(&mut registry).unwrap();

        for def in registry.get_all() {
            for dep in &def.dependencies {
                assert!(registry.get(dep).is_some(), "{} depends on unknown {dep}", def.name);
            }
            for conflict in &def.conflicts {
                assert!(
                    registry.get(conflict).is_some(),
                    "{} conflicts with unknown {conflict}",
                    def.name
                );
            }
            for integration in &def.integrations {
                assert!(
                    registry.get(&integration.plugin).is_some(),
                    "{} integrates with unknown {}",
                    def.name,
                    integration.plugin
                );
            }
        }
    }

    #[test]
    fn api_plugins_conflict_symmetrically() {
        let mut registry = PluginRegistry::new();
        register_builtins(&mut registry).unwrap();

        assert!(registry.get("trpc").unwrap().conflicts.contains(&"apollo".to_string()));
        assert!(registry.get("apollo").unwrap().conflicts.contains(&"trpc".to_string()));
    }

    #[test]
    fn every_template_body_parses_and_renders() {
        use scaforge_core::domain::OptionMap;
        use scaforge_core::template::{BindingContext, render};

        let mut registry = PluginRegistry::new();
        register_builtins(&mut registry).unwrap();

        for def in registry.get_all() {
            // Render with each plugin's schema defaults.
            let options = def
                .config_schema
                .as_ref()
                .map(|s| s.resolve(&OptionMap::new()).unwrap())
                .unwrap_or_default();
            let ctx = BindingContext::new(
                "nextjs",
                options,
                "demo-app",
                registry.get_all().iter().map(|d| d.name.clone()),
            );

            let all_specs = def
                .files
                .iter()
                .chain(def.integrations.iter().flat_map(|i| i.files.iter()));
            for spec in all_specs {
                render(&spec.path, &ctx).unwrap();
                render(&spec.template, &ctx).unwrap();
            }
            if let Some(note) = &def.post_install {
                render(note, &ctx).unwrap();
            }
        }
    }
}
