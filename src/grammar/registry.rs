// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Compiles a set of grammar builders and merges them.
//!
//! # Compilation order
//!
//! Builders are validated first (unique names per kind, resolvable
//! dependencies, no cycles), then grouped into topological levels with
//! Kahn's algorithm. Every builder in a level only reads grammars from
//! earlier levels, so a level is compiled in parallel on scoped threads,
//! at most `max_concurrency` at a time.
//!
//! # Assembly
//!
//! The classifier is
//!
//! ```text
//! token       = "tokens { " (weighted classify grammars) " }"
//! punct_token = "tokens { " (weighted punct grammar) " }"
//! unit        = (punct_token " ")* token (" " punct_token)*
//! classifier  = ws* unit (join unit)* ws*
//! ```
//!
//! where `join` collapses a whitespace run to a single space and costs the
//! join weight. The verbalizer reads exactly one `tokens { ... }` and is the
//! union of the verbalize grammars.

use crate::config::consts::{default_max_concurrency, DEFAULT_MAX_STATES, JOIN_WEIGHT};
use crate::errors::{BuildError, GrammarError};
use crate::fst::{
    closure, concat, concat_all, delete, insert, optimize, union, weighted, Charset, Fst, Weight,
};
use crate::grammar::{
    BuildContext, Direction, Grammar, GrammarBuilder, GrammarKind, PriorityPolicy,
};
use crate::lexicon::{Language, Lexicon};
use crate::observability::messages::grammar::{
    GrammarCompiled, GrammarLevelsComputed, RegistryComposed, StateLimitExceeded,
};
use crate::observability::messages::validation::CyclicDependencyDetected;
use crate::observability::messages::StructuredLog;
use crate::token::SemioticClass;
use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Instant;

type GrammarKey = (GrammarKind, String);

#[derive(Debug, Clone)]
pub struct RegistryOptions {
    pub deterministic: bool,
    pub max_states: usize,
    pub max_concurrency: usize,
    pub join_weight: f32,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            deterministic: true,
            max_states: DEFAULT_MAX_STATES,
            max_concurrency: default_max_concurrency(),
            join_weight: JOIN_WEIGHT,
        }
    }
}

/// Compiled grammars for one language and direction, plus the merged
/// classifier and verbalizer. Immutable once built and cheap to share.
#[derive(Debug)]
pub struct Registry {
    language: Language,
    direction: Direction,
    deterministic: bool,
    grammars: Vec<Grammar>,
    classifier: Fst,
    verbalizer: Fst,
}

impl Registry {
    pub fn build(
        lexicon: &Lexicon,
        direction: Direction,
        builders: Vec<Box<dyn GrammarBuilder>>,
        policy: &dyn PriorityPolicy,
        options: &RegistryOptions,
    ) -> Result<Self, GrammarError> {
        let started = Instant::now();
        if let Err(errors) = validate_builders(&builders) {
            for error in &errors {
                tracing::error!("{}", error);
            }
            if let Some(first) = errors.into_iter().next() {
                return Err(first.into());
            }
        }

        let levels = compute_levels(&builders);
        let levels_computed = GrammarLevelsComputed {
            level_count: levels.len(),
            grammar_count: builders.len(),
        };
        levels_computed.log();
        let _compiling = levels_computed.span("compile_registry").entered();

        let charset = Charset::new()?;
        let mut built: HashMap<GrammarKey, Grammar> = HashMap::new();
        for level in &levels {
            for chunk in level.chunks(options.max_concurrency.max(1)) {
                let compiled: Vec<Result<Grammar, GrammarError>> = std::thread::scope(|scope| {
                    let handles: Vec<_> = chunk
                        .iter()
                        .map(|&index| {
                            let builder = builders[index].as_ref();
                            let ctx = BuildContext::new(
                                lexicon,
                                &charset,
                                options.deterministic,
                                builder.kind(),
                                &built,
                            );
                            scope.spawn(move || compile_grammar(builder, &ctx, policy, options))
                        })
                        .collect();
                    handles
                        .into_iter()
                        .map(|handle| {
                            handle
                                .join()
                                .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
                        })
                        .collect()
                });
                for grammar in compiled {
                    let grammar = grammar?;
                    built.insert((grammar.kind, grammar.name.clone()), grammar);
                }
            }
        }

        // Builder order, so assembly does not depend on scheduling.
        let grammars: Vec<Grammar> = builders
            .iter()
            .filter_map(|b| built.remove(&(b.kind(), b.name().to_string())))
            .collect();

        let classifier = assemble_classifier(&grammars, &charset, options.join_weight)?;
        check_states("classifier", &classifier, options.max_states)?;
        let verbalizer = assemble_verbalizer(&grammars, &charset)?;
        check_states("verbalizer", &verbalizer, options.max_states)?;

        let language = lexicon.language().to_string();
        let direction_name = direction.to_string();
        RegistryComposed {
            language: &language,
            direction: &direction_name,
            grammar_count: grammars.len(),
            classifier_states: classifier.num_states(),
            verbalizer_states: verbalizer.num_states(),
            duration: started.elapsed(),
        }
        .log();

        Ok(Self {
            language: lexicon.language(),
            direction,
            deterministic: options.deterministic,
            grammars,
            classifier,
            verbalizer,
        })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn deterministic(&self) -> bool {
        self.deterministic
    }

    /// Raw sentence to `tokens { ... }` stream.
    pub fn classifier(&self) -> &Fst {
        &self.classifier
    }

    /// One serialized token to its surface text.
    pub fn verbalizer(&self) -> &Fst {
        &self.verbalizer
    }

    pub fn grammars(&self) -> &[Grammar] {
        &self.grammars
    }

    pub fn grammar(&self, kind: GrammarKind, name: &str) -> Option<&Grammar> {
        self.grammars
            .iter()
            .find(|g| g.kind == kind && g.name == name)
    }
}

fn compile_grammar(
    builder: &dyn GrammarBuilder,
    ctx: &BuildContext<'_>,
    policy: &dyn PriorityPolicy,
    options: &RegistryOptions,
) -> Result<Grammar, GrammarError> {
    let started = Instant::now();
    let graph = builder.build(ctx)?;
    let fst = optimize(&graph.fst);
    check_states(builder.name(), &fst, options.max_states)?;

    let weight = match builder.kind() {
        GrammarKind::Classify => policy.weight(builder.class()),
        GrammarKind::Verbalize => Weight::ONE,
    };
    let kind = builder.kind().to_string();
    GrammarCompiled {
        name: builder.name(),
        kind: &kind,
        states: fst.num_states(),
        transitions: fst.num_transitions(),
        duration: started.elapsed(),
    }
    .log();

    Ok(Grammar {
        name: builder.name().to_string(),
        kind: builder.kind(),
        class: builder.class(),
        deterministic: ctx.deterministic,
        weight,
        fst,
        exports: graph.exports,
    })
}

fn check_states(name: &str, fst: &Fst, limit: usize) -> Result<(), BuildError> {
    if fst.num_states() > limit {
        StateLimitExceeded {
            name,
            states: fst.num_states(),
            limit,
        }
        .log();
        return Err(BuildError::StateLimitExceeded {
            name: name.to_string(),
            states: fst.num_states(),
            limit,
        });
    }
    Ok(())
}

fn find_classifier<'a>(
    grammars: &'a [Grammar],
    class: SemioticClass,
    missing: &'static str,
) -> Result<&'a Grammar, BuildError> {
    grammars
        .iter()
        .find(|g| g.kind == GrammarKind::Classify && g.class == class)
        .ok_or(BuildError::MissingGrammar(missing))
}

fn assemble_classifier(
    grammars: &[Grammar],
    charset: &Charset,
    join_weight: f32,
) -> Result<Fst, GrammarError> {
    let punct = find_classifier(grammars, SemioticClass::Punct, "punct")?;
    find_classifier(grammars, SemioticClass::Word, "word")?;

    let alternatives = grammars
        .iter()
        .filter(|g| g.kind == GrammarKind::Classify && g.class != SemioticClass::Punct)
        .map(|g| weighted(&g.fst, g.weight.value()))
        .collect::<Result<Vec<_>, _>>()?;
    let refs: Vec<&Fst> = alternatives.iter().collect();
    let classify = union(&refs)?;

    let open = insert("tokens { ")?;
    let close = insert(" }")?;
    let space = insert(" ")?;
    let token = concat_all(&[&open, &classify, &close])?;
    let punct_token = concat_all(&[&open, &weighted(&punct.fst, punct.weight.value())?, &close])?;

    let leading = closure(&concat(&punct_token, &space)?, 0, None)?;
    let trailing = closure(&concat(&space, &punct_token)?, 0, None)?;
    // punctuation hugs the neighbouring token, or stands alone
    let unit = union(&[
        &concat_all(&[&leading, &token, &trailing])?,
        &concat(&punct_token, &trailing)?,
    ])?;
    let join = weighted(&charset.delete_extra_space, join_weight)?;
    let more = closure(&concat(&join, &unit)?, 0, None)?;
    let graph = concat_all(&[&charset.delete_space, &unit, &more, &charset.delete_space])?;
    Ok(optimize(&graph))
}

fn assemble_verbalizer(grammars: &[Grammar], charset: &Charset) -> Result<Fst, GrammarError> {
    let verbalizers: Vec<&Fst> = grammars
        .iter()
        .filter(|g| g.kind == GrammarKind::Verbalize)
        .map(|g| &g.fst)
        .collect();
    if !grammars
        .iter()
        .any(|g| g.kind == GrammarKind::Verbalize && g.class.is_plain())
    {
        return Err(BuildError::MissingGrammar("word verbalizer").into());
    }
    let body = union(&verbalizers)?;
    let graph = concat_all(&[
        &delete("tokens")?,
        &charset.delete_space,
        &delete("{")?,
        &charset.delete_space,
        &body,
        &charset.delete_space,
        &delete("}")?,
    ])?;
    Ok(optimize(&graph))
}

/// Checks names, references and cycles, collecting every problem found.
fn validate_builders(builders: &[Box<dyn GrammarBuilder>]) -> Result<(), Vec<BuildError>> {
    let mut errors = Vec::new();

    let mut seen = HashSet::new();
    for builder in builders {
        if !seen.insert((builder.kind(), builder.name())) {
            errors.push(BuildError::DuplicateGrammar {
                kind: builder.kind().to_string(),
                name: builder.name().to_string(),
            });
        }
    }

    for builder in builders {
        for dependency in builder.depends_on() {
            if !seen.contains(&(builder.kind(), *dependency)) {
                errors.push(BuildError::UnresolvedDependency {
                    grammar: builder.name().to_string(),
                    missing: dependency.to_string(),
                });
            }
        }
    }

    // Cycle detection needs a well-formed graph.
    if errors.is_empty() {
        if let Some(cycle) = find_cycle(builders) {
            let names: Vec<&str> = cycle.iter().map(String::as_str).collect();
            CyclicDependencyDetected { cycle: &names }.log();
            errors.push(BuildError::CyclicDependency { cycle });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn index_of(builders: &[Box<dyn GrammarBuilder>]) -> HashMap<(GrammarKind, &str), usize> {
    builders
        .iter()
        .enumerate()
        .map(|(i, b)| ((b.kind(), b.name()), i))
        .collect()
}

/// Depth-first search with a recursion stack; returns the first cycle found
/// as `a -> b -> ... -> a`.
fn find_cycle(builders: &[Box<dyn GrammarBuilder>]) -> Option<Vec<String>> {
    let index = index_of(builders);
    let deps: Vec<Vec<usize>> = builders
        .iter()
        .map(|b| {
            b.depends_on()
                .iter()
                .filter_map(|d| index.get(&(b.kind(), *d)).copied())
                .collect()
        })
        .collect();

    fn visit(
        node: usize,
        deps: &[Vec<usize>],
        visited: &mut [bool],
        on_stack: &mut [bool],
        path: &mut Vec<usize>,
    ) -> Option<Vec<usize>> {
        visited[node] = true;
        on_stack[node] = true;
        path.push(node);
        for &next in &deps[node] {
            if on_stack[next] {
                let start = path.iter().position(|&n| n == next).unwrap_or(0);
                let mut cycle = path[start..].to_vec();
                cycle.push(next);
                return Some(cycle);
            }
            if !visited[next] {
                if let Some(cycle) = visit(next, deps, visited, on_stack, path) {
                    return Some(cycle);
                }
            }
        }
        on_stack[node] = false;
        path.pop();
        None
    }

    let mut visited = vec![false; builders.len()];
    let mut on_stack = vec![false; builders.len()];
    for start in 0..builders.len() {
        if visited[start] {
            continue;
        }
        let mut path = Vec::new();
        if let Some(cycle) = visit(start, &deps, &mut visited, &mut on_stack, &mut path) {
            return Some(
                cycle
                    .into_iter()
                    .map(|i| builders[i].name().to_string())
                    .collect(),
            );
        }
    }
    None
}

/// Kahn's algorithm, one level at a time. Assumes a validated, acyclic set.
fn compute_levels(builders: &[Box<dyn GrammarBuilder>]) -> Vec<Vec<usize>> {
    let index = index_of(builders);
    let mut in_degree: Vec<usize> = builders.iter().map(|b| b.depends_on().len()).collect();
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); builders.len()];
    for (i, builder) in builders.iter().enumerate() {
        for dependency in builder.depends_on() {
            if let Some(&d) = index.get(&(builder.kind(), *dependency)) {
                dependents[d].push(i);
            }
        }
    }

    let mut levels = Vec::new();
    let mut queue: VecDeque<usize> = (0..builders.len()).filter(|&i| in_degree[i] == 0).collect();
    while !queue.is_empty() {
        let mut level: Vec<usize> = queue.drain(..).collect();
        level.sort_unstable();
        for &node in &level {
            for &dependent in &dependents[node] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    queue.push_back(dependent);
                }
            }
        }
        levels.push(level);
    }
    levels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst::{cross, difference, search::Lattice};
    use crate::grammar::markup::{add_tokens, delete_tokens, field, take_field};
    use crate::grammar::{CompiledGraph, PriorityTable};

    type BuildFn = fn(&BuildContext<'_>) -> Result<CompiledGraph, GrammarError>;

    struct Toy {
        name: &'static str,
        kind: GrammarKind,
        class: SemioticClass,
        deps: &'static [&'static str],
        build: BuildFn,
    }

    impl GrammarBuilder for Toy {
        fn name(&self) -> &'static str {
            self.name
        }
        fn kind(&self) -> GrammarKind {
            self.kind
        }
        fn class(&self) -> SemioticClass {
            self.class
        }
        fn depends_on(&self) -> &'static [&'static str] {
            self.deps
        }
        fn build(&self, ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
            (self.build)(ctx)
        }
    }

    fn toy(
        name: &'static str,
        kind: GrammarKind,
        class: SemioticClass,
        deps: &'static [&'static str],
        build: BuildFn,
    ) -> Box<dyn GrammarBuilder> {
        Box::new(Toy {
            name,
            kind,
            class,
            deps,
            build,
        })
    }

    fn numbers(_: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let one = cross("1", "one")?;
        let tagged = add_tokens(SemioticClass::Cardinal, &field("integer", &one)?)?;
        Ok(CompiledGraph::new(tagged).with_export("numbers", one))
    }

    fn ordinals(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let numbers = ctx.export("cardinal", "numbers")?;
        let graph = concat(&numbers, &cross("st", "th")?)?;
        Ok(CompiledGraph::new(add_tokens(
            SemioticClass::Ordinal,
            &field("integer", &graph)?,
        )?))
    }

    fn words(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let letter = difference(&ctx.charset.not_space, &ctx.charset.digit)?;
        let letter = difference(&letter, &ctx.charset.punct)?;
        Ok(CompiledGraph::new(field("name", &closure(&letter, 1, None)?)?))
    }

    fn punct(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        Ok(CompiledGraph::new(field("name", &ctx.charset.punct)?))
    }

    fn say_name(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        Ok(CompiledGraph::new(take_field(ctx.charset, "name")?))
    }

    fn say_cardinal(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let body = take_field(ctx.charset, "integer")?;
        Ok(CompiledGraph::new(delete_tokens(
            ctx.charset,
            SemioticClass::Cardinal,
            &body,
        )?))
    }

    fn unreachable_build(_: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        Ok(CompiledGraph::new(insert("")?))
    }

    fn toy_set() -> Vec<Box<dyn GrammarBuilder>> {
        use GrammarKind::*;
        vec![
            toy("ordinal", Classify, SemioticClass::Ordinal, &["cardinal"], ordinals),
            toy("cardinal", Classify, SemioticClass::Cardinal, &[], numbers),
            toy("word", Classify, SemioticClass::Word, &[], words),
            toy("punct", Classify, SemioticClass::Punct, &[], punct),
            toy("cardinal", Verbalize, SemioticClass::Cardinal, &[], say_cardinal),
            toy("word", Verbalize, SemioticClass::Word, &[], say_name),
        ]
    }

    fn build(builders: Vec<Box<dyn GrammarBuilder>>) -> Result<Registry, GrammarError> {
        let lexicon = Lexicon::builtin(Language::Persian)?;
        Registry::build(
            &lexicon,
            Direction::Tn,
            builders,
            &PriorityTable::default(),
            &RegistryOptions::default(),
        )
    }

    fn classify(registry: &Registry, input: &str) -> Option<String> {
        Lattice::build(registry.classifier(), input)
            .and_then(|l| l.best_path())
            .map(|h| h.output)
    }

    #[test]
    fn test_classifier_segments_and_collapses_whitespace() {
        let registry = build(toy_set()).unwrap();

        struct TestCase {
            name: &'static str,
            input: &'static str,
            expected: Option<&'static str>,
        }

        let test_cases = vec![
            TestCase {
                name: "number then word",
                input: "1   ab",
                expected: Some(r#"tokens { cardinal { integer: "one" } } tokens { name: "ab" }"#),
            },
            TestCase {
                name: "dependent grammar",
                input: "1st",
                expected: Some(r#"tokens { ordinal { integer: "oneth" } }"#),
            },
            TestCase {
                name: "attached punctuation",
                input: " ab, ",
                expected: Some(r#"tokens { name: "ab" } tokens { name: "," }"#),
            },
            TestCase {
                name: "standalone punctuation",
                input: "ab ! 1",
                expected: Some(
                    r#"tokens { name: "ab" } tokens { name: "!" } tokens { cardinal { integer: "one" } }"#,
                ),
            },
            TestCase {
                name: "unknown digit",
                input: "2",
                expected: None,
            },
        ];

        for case in test_cases {
            assert_eq!(
                classify(&registry, case.input).as_deref(),
                case.expected,
                "case '{}'",
                case.name
            );
        }
    }

    #[test]
    fn test_verbalizer_reads_one_token() {
        let registry = build(toy_set()).unwrap();
        let out = Lattice::build(
            registry.verbalizer(),
            r#"tokens { cardinal { integer: "one" } }"#,
        )
        .and_then(|l| l.best_path())
        .map(|h| h.output);
        assert_eq!(out.as_deref(), Some("one"));
    }

    #[test]
    fn test_builder_order_is_kept_and_levels_respect_dependencies() {
        let builders = toy_set();
        let levels = compute_levels(&builders);
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[1], vec![0]);

        let registry = build(toy_set()).unwrap();
        let names: Vec<&str> = registry.grammars().iter().map(|g| g.name()).collect();
        assert_eq!(names, vec!["ordinal", "cardinal", "word", "punct", "cardinal", "word"]);
        let cardinal = registry.grammar(GrammarKind::Classify, "cardinal").unwrap();
        assert_eq!(cardinal.weight().value(), 1.1);
    }

    #[test]
    fn test_validation_failures() {
        use GrammarKind::*;

        let mut duplicate = toy_set();
        duplicate.push(toy("word", Classify, SemioticClass::Word, &[], words));
        assert!(matches!(
            build(duplicate),
            Err(GrammarError::Build(BuildError::DuplicateGrammar { .. }))
        ));

        let mut unresolved = toy_set();
        unresolved.push(toy("date", Classify, SemioticClass::Date, &["calendar"], unreachable_build));
        assert!(matches!(
            build(unresolved),
            Err(GrammarError::Build(BuildError::UnresolvedDependency { ref missing, .. })) if missing == "calendar"
        ));

        let cyclic = vec![
            toy("a", Classify, SemioticClass::Date, &["b"], unreachable_build),
            toy("b", Classify, SemioticClass::Time, &["a"], unreachable_build),
        ];
        match build(cyclic) {
            Err(GrammarError::Build(BuildError::CyclicDependency { cycle })) => {
                assert_eq!(cycle.first(), cycle.last());
                assert_eq!(cycle.len(), 3);
            }
            other => panic!("expected cycle, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_missing_plain_grammars() {
        let without_punct: Vec<_> = toy_set()
            .into_iter()
            .filter(|b| b.class() != SemioticClass::Punct)
            .collect();
        assert!(matches!(
            build(without_punct),
            Err(GrammarError::Build(BuildError::MissingGrammar("punct")))
        ));
    }

    #[test]
    fn test_state_limit() {
        let lexicon = Lexicon::builtin(Language::Persian).unwrap();
        let options = RegistryOptions {
            max_states: 3,
            ..RegistryOptions::default()
        };
        let result = Registry::build(
            &lexicon,
            Direction::Tn,
            toy_set(),
            &PriorityTable::default(),
            &options,
        );
        assert!(matches!(
            result,
            Err(GrammarError::Build(BuildError::StateLimitExceeded { limit: 3, .. }))
        ));
    }

    #[derive(Clone, Default)]
    struct Capture(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_composition_is_logged_inside_the_compile_span() {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || build(toy_set()).unwrap());

        let output = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        let composed = output
            .lines()
            .find(|line| line.contains("Composed"))
            .unwrap_or_else(|| panic!("no composition event in {}", output));
        assert!(composed.contains("grammar_levels"), "{}", composed);
        assert!(composed.contains("compile_registry"), "{}", composed);
    }

    #[test]
    fn test_construction_is_repeatable() {
        let first = build(toy_set()).unwrap();
        let second = build(toy_set()).unwrap();
        for input in ["1 ab", "ab, 1st", "1"] {
            assert_eq!(classify(&first, input), classify(&second, input), "{}", input);
        }
    }
}
