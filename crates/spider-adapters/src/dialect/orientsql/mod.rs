//! OrientDB SQL processor.
//!
//! Lowers Bags to OrientDB's SQL dialect:
//!
//! | Command | Statement |
//! | ------- | --------- |
//! | Retrieve | `SELECT [fields] FROM <target> [WHERE ...] [ORDER BY ...] [LIMIT n]` |
//! | Create (vertex) | `INSERT INTO <class> [CONTENT {...}]` |
//! | Create (edge) | `CREATE EDGE <class> FROM <out> TO <in> [CONTENT {...}]` |
//! | Update | `UPDATE <class> [MERGE {...}] RETURN AFTER $current [WHERE ...] [LIMIT n]` |
//! | Delete | `DELETE VERTEX\|EDGE [FROM (subquery)\|<target>] [WHERE ...] [LIMIT n]` |
//!
//! An embedded command can stand in for the target of a retrieve, update,
//! or delete. A create needs a class, so an embedded target is rejected.
//!
//! ```
//! use spider_adapters::dialect::orientsql::OrientSqlProcessor;
//! use spider_core::{Bag, CommandKind, Constraint, DialectProcessor, MetaField};
//!
//! let bag = Bag::new(CommandKind::Retrieve)
//!     .with_constraint(Constraint::equals(MetaField::ElementLabel, "Cat"));
//!
//! let command = OrientSqlProcessor::new().compile(&bag)?;
//! assert_eq!(command.script(), "SELECT FROM Cat");
//! assert_eq!(command.dialect(), "orientSQL");
//! # Ok::<(), spider_common::Error>(())
//! ```

mod clauses;
mod tables;

pub use clauses::{cast_value, quote, resolve_target};
pub use tables::{
    DEFAULT_CLASS, DIALECT, ElementKind, conjunction, field_name, native_field, operator, order,
    verb,
};

use std::borrow::Cow;

use spider_common::utils::error::{ClauseStep, CompileError, Result};
use spider_core::{
    Bag, Command, CommandKind, CompileContext, DEFAULT_MAX_DEPTH, DialectProcessor, MetaField,
    ScriptBuffer, Target,
};
use tracing::{debug, trace};

/// Compiler from Bags to OrientDB SQL.
///
/// Holds configuration only; every compilation owns its buffer and context.
#[derive(Debug, Clone)]
pub struct OrientSqlProcessor {
    max_depth: usize,
}

impl OrientSqlProcessor {
    /// Creates a processor with the default nesting bound.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the bound on embedded command nesting.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Configured nesting bound.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn root_context(&self) -> CompileContext {
        CompileContext::root(self.max_depth)
    }

    fn compile_statement(&self, bag: &Bag, ctx: CompileContext) -> Result<String> {
        let mut buf = ScriptBuffer::new();
        match bag.command {
            CommandKind::Retrieve => self.compile_retrieve(bag, ctx, &mut buf)?,
            CommandKind::Create => self.compile_create(bag, ctx, &mut buf)?,
            CommandKind::Update => self.compile_update(bag, ctx, &mut buf)?,
            CommandKind::Delete => self.compile_delete(bag, ctx, &mut buf)?,
        }
        Ok(buf.into_script())
    }

    fn compile_retrieve(
        &self,
        bag: &Bag,
        ctx: CompileContext,
        buf: &mut ScriptBuffer,
    ) -> Result<()> {
        let verb = tables::verb(CommandKind::Retrieve, ElementKind::Vertex);
        buf.push(ClauseStep::Start, verb)?;
        clauses::append_projections(buf, &bag.projections)?;
        let remaining = self.append_target(buf, "from", bag, ctx)?;
        clauses::append_wheres(buf, remaining)?;
        clauses::append_order(buf, bag)?;
        clauses::append_limit(buf, bag)
    }

    fn compile_create(
        &self,
        bag: &Bag,
        ctx: CompileContext,
        buf: &mut ScriptBuffer,
    ) -> Result<()> {
        let kind = ElementKind::from_value(bag.meta_data(MetaField::ElementType));
        let class = clauses::resolve_class(bag, || match &bag.target {
            Some(Target::Embedded(inner)) => Err(CompileError::InvalidScriptToken {
                step: ClauseStep::Class,
                value: format!("embedded {} command", inner.command),
            }
            .into()),
            _ => self.explicit_target(bag, ctx),
        })?
        .ok_or_else(|| CompileError::UnresolvedTarget {
            command: CommandKind::Create.to_string(),
        })?;

        buf.push(ClauseStep::Start, tables::verb(CommandKind::Create, kind))?;
        buf.push(ClauseStep::Class, &class)?;
        if kind == ElementKind::Edge {
            let out = Self::endpoint(bag, MetaField::EdgeOutVertex, "out")?;
            let into = Self::endpoint(bag, MetaField::EdgeInVertex, "in")?;
            buf.push(ClauseStep::Endpoints, "FROM")?;
            buf.push(ClauseStep::Endpoints, out)?;
            buf.push(ClauseStep::Endpoints, "TO")?;
            buf.push(ClauseStep::Endpoints, into)?;
        }
        clauses::append_content(buf, "CONTENT", bag)
    }

    fn compile_update(
        &self,
        bag: &Bag,
        ctx: CompileContext,
        buf: &mut ScriptBuffer,
    ) -> Result<()> {
        let class = clauses::resolve_class(bag, || self.explicit_target(bag, ctx))?
            .unwrap_or(Cow::Borrowed(DEFAULT_CLASS));

        let verb = tables::verb(CommandKind::Update, ElementKind::Vertex);
        buf.push(ClauseStep::Start, verb)?;
        buf.push(ClauseStep::Class, &class)?;
        clauses::append_content(buf, "MERGE", bag)?;
        buf.push(ClauseStep::Return, "RETURN AFTER $current")?;
        clauses::append_wheres(buf, &bag.constraints)?;
        clauses::append_limit(buf, bag)
    }

    fn compile_delete(
        &self,
        bag: &Bag,
        ctx: CompileContext,
        buf: &mut ScriptBuffer,
    ) -> Result<()> {
        let kind = ElementKind::from_value(
            bag.constraints
                .iter()
                .find(|c| c.is_on(MetaField::ElementType))
                .map(|c| &c.value),
        );

        buf.push(ClauseStep::Start, tables::verb(CommandKind::Delete, kind))?;
        let remaining = self.append_target(buf, "", bag, ctx)?;
        clauses::append_wheres(buf, remaining)?;
        clauses::append_limit(buf, bag)
    }

    /// Emits `[PREFIX] <target>` and returns the constraints that are still
    /// predicates. An empty prefix emits the target alone, except before a
    /// subquery, which OrientDB only accepts after `FROM`.
    fn append_target<'a>(
        &self,
        buf: &mut ScriptBuffer,
        prefix: &str,
        bag: &'a Bag,
        ctx: CompileContext,
    ) -> Result<clauses::Remaining<'a>> {
        let (labeled, remaining) = clauses::resolve_target(&bag.constraints);
        let (target, embedded) = match labeled {
            Some(value) => (
                Cow::Borrowed(clauses::token(value, ClauseStep::Target)?),
                false,
            ),
            None => (
                self.explicit_target(bag, ctx)?
                    .unwrap_or(Cow::Borrowed(DEFAULT_CLASS)),
                matches!(bag.target, Some(Target::Embedded(_))),
            ),
        };
        trace!(resolved = %target, embedded, "resolved target");

        let prefix = match prefix {
            "" if embedded => "from",
            other => other,
        };
        if !prefix.is_empty() {
            buf.push(ClauseStep::Target, &prefix.to_uppercase())?;
        }
        buf.push(ClauseStep::Target, &target)?;
        Ok(remaining)
    }

    /// Renders the Bag's explicit target, compiling it when it is embedded.
    fn explicit_target<'a>(
        &self,
        bag: &'a Bag,
        ctx: CompileContext,
    ) -> Result<Option<Cow<'a, str>>> {
        match &bag.target {
            None => Ok(None),
            Some(Target::Class(name)) => Ok(Some(Cow::Borrowed(name.as_str()))),
            Some(Target::Embedded(inner)) => {
                let script = self.compile_embedded(inner, ctx)?;
                Ok(Some(Cow::Owned(format!("({script})"))))
            }
        }
    }

    fn endpoint<'a>(bag: &'a Bag, meta: MetaField, name: &'static str) -> Result<&'a str> {
        let value = bag
            .meta_data(meta)
            .ok_or(CompileError::MissingEdgeEndpoint { endpoint: name })?;
        Ok(clauses::token(value, ClauseStep::Endpoints)?)
    }
}

impl Default for OrientSqlProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl DialectProcessor for OrientSqlProcessor {
    fn dialect(&self) -> &str {
        DIALECT
    }

    fn compile(&self, bag: &Bag) -> Result<Command> {
        let script = self.compile_statement(bag, self.root_context())?;
        debug!(dialect = DIALECT, command = %bag.command, script = %script, "compiled command");
        Ok(Command::new(script, DIALECT))
    }

    fn compile_embedded(&self, bag: &Bag, ctx: CompileContext) -> Result<String> {
        let ctx = ctx.nested()?;
        trace!(depth = ctx.depth(), command = %bag.command, "compiling embedded command");
        self.compile_statement(bag, ctx)
    }

    fn compile_batch(&self, bags: &[Bag]) -> Result<Command> {
        if bags.is_empty() {
            return Err(CompileError::EmptyBatch.into());
        }

        let ctx = self.root_context();
        let mut lines = Vec::with_capacity(bags.len() + 3);
        let mut variables = Vec::with_capacity(bags.len());
        lines.push("BEGIN".to_string());
        for (i, bag) in bags.iter().enumerate() {
            let statement = self.compile_embedded(bag, ctx)?;
            lines.push(format!("LET t{i} = {statement}"));
            variables.push(format!("$t{i}"));
        }
        lines.push("COMMIT".to_string());
        lines.push(format!("RETURN [{}]", variables.join(",")));

        let script = lines.join("\n");
        debug!(dialect = DIALECT, statements = bags.len(), "compiled batch");
        Ok(Command::new(script, DIALECT))
    }
}
