//! Schema migrations for the blog database.
//!
//! Steps are declared with the steps they build on; [`Migrator`] hands them
//! to the runner in dependency order.

pub use sea_orm_migration::prelude::*;

pub mod plan;
mod schema;

mod m20241028_000001_create_users_table;
mod m20241028_000002_create_post_table;
mod m20241029_000003_add_post_status;
mod m20241029_000004_alter_post_options;
mod m20241030_000005_alter_post_publish;
mod m20241030_000006_create_comment_table;
mod m20241030_000007_create_taggit_tables;
mod m20241030_000008_add_post_tags;

use plan::{Node, PlanError};

const USERS: &str = "m20241028_000001_create_users_table";
const POST: &str = "m20241028_000002_create_post_table";
const POST_STATUS: &str = "m20241029_000003_add_post_status";
const POST_OPTIONS: &str = "m20241029_000004_alter_post_options";
const POST_PUBLISH: &str = "m20241030_000005_alter_post_publish";
const COMMENT: &str = "m20241030_000006_create_comment_table";
const TAGGIT: &str = "m20241030_000007_create_taggit_tables";

/// A migration together with the names of the migrations it needs first.
pub struct Step {
    pub migration: Box<dyn MigrationTrait>,
    pub depends_on: &'static [&'static str],
}

impl Step {
    fn new<M: MigrationTrait + 'static>(migration: M, depends_on: &'static [&'static str]) -> Self {
        Self {
            migration: Box::new(migration),
            depends_on,
        }
    }

    pub fn name(&self) -> &str {
        self.migration.name()
    }
}

/// Every step, in declaration order.
pub fn steps() -> Vec<Step> {
    vec![
        Step::new(m20241028_000001_create_users_table::Migration, &[]),
        Step::new(m20241028_000002_create_post_table::Migration, &[USERS]),
        Step::new(m20241029_000003_add_post_status::Migration, &[POST]),
        Step::new(m20241029_000004_alter_post_options::Migration, &[POST_STATUS]),
        Step::new(m20241030_000005_alter_post_publish::Migration, &[POST_OPTIONS]),
        Step::new(m20241030_000006_create_comment_table::Migration, &[POST_PUBLISH]),
        // Tags are a standalone app; posts only reference them in step 8.
        Step::new(m20241030_000007_create_taggit_tables::Migration, &[]),
        Step::new(m20241030_000008_add_post_tags::Migration, &[COMMENT, TAGGIT]),
    ]
}

/// Put `steps` in an order where each migration follows its predecessors.
pub fn ordered(steps: Vec<Step>) -> Result<Vec<Box<dyn MigrationTrait>>, PlanError> {
    let order = {
        let nodes: Vec<Node<'_>> = steps
            .iter()
            .map(|step| Node {
                name: step.name(),
                depends_on: step.depends_on,
            })
            .collect();
        plan::resolve(&nodes)?
    };

    let mut slots: Vec<Option<Box<dyn MigrationTrait>>> =
        steps.into_iter().map(|step| Some(step.migration)).collect();

    Ok(order
        .into_iter()
        .filter_map(|i| slots.get_mut(i).and_then(Option::take))
        .collect())
}

/// Names of all migrations in the order they are applied.
pub fn plan_names() -> Result<Vec<String>, PlanError> {
    Ok(ordered(steps())?
        .iter()
        .map(|migration| migration.name().to_owned())
        .collect())
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        match ordered(steps()) {
            Ok(migrations) => migrations,
            Err(err) => {
                tracing::error!(error = %err, "Migration graph is invalid, nothing to apply");
                Vec::new()
            }
        }
    }
}
