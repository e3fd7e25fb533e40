//! Tree-walk listener: walks the typed AST and builds the unresolved
//! [`SchemaArena`]. Holder-rule violations and other structural
//! problems are reported as [`CompileError`]s, never silently dropped.

use crate::base::{FileId, Name, Span};
use crate::hir::arena::*;
use crate::hir::diagnostics::CompileError;
use crate::hir::types::{BitValue, BuiltinType, EnumValue, IdentityRefTarget, Restrictions, TypeRef};
use crate::parser::{self, keywords as kw, AstNode, Statement};

/// The lowered root of one parsed file: its module/submodule node.
pub struct ModuleRoot {
    pub file: FileId,
    pub root: NodeId,
}

struct LowerCtx<'a> {
    arena: &'a mut SchemaArena,
    file: FileId,
    errors: Vec<CompileError>,
}

impl<'a> LowerCtx<'a> {
    fn span(&self, stmt: &Statement) -> Span {
        Span::new(self.file, stmt.range())
    }

    fn name_of(&self, stmt: &Statement) -> Name {
        Name::new(stmt.argument().unwrap_or_default())
    }
}

/// Statement keywords that are only legal directly under the listed
/// parent keyword. Keywords not listed here are validated
/// structurally: the generic body-statement dispatcher only ever calls
/// a keyword's lowering function from a parent that is itself a legal
/// data-tree/definition container, so no table entry is needed.
const RESTRICTED_HOLDERS: &[(&str, &[&str])] = &[
    (kw::CASE, &["choice"]),
    (kw::INPUT, &["rpc", "action"]),
    (kw::OUTPUT, &["rpc", "action"]),
    (kw::IDENTITY, &["module", "submodule"]),
    (kw::FEATURE, &["module", "submodule"]),
    (kw::REVISION_DATE, &["import", "include"]),
    (kw::KEY, &["list"]),
];

fn check_holder(parent_tag: &str, child_keyword: &str, span: Span, errors: &mut Vec<CompileError>) -> bool {
    if let Some((_, allowed)) = RESTRICTED_HOLDERS.iter().find(|(k, _)| *k == child_keyword) {
        if !allowed.contains(&parent_tag) {
            errors.push(CompileError::InvalidHolder {
                span,
                message: format!("'{child_keyword}' is not valid inside '{parent_tag}'"),
            });
            return false;
        }
    }
    true
}

/// Parse a file's text into an unresolved module/submodule node.
pub fn lower_file(file: FileId, text: &str, arena: &mut SchemaArena) -> Result<ModuleRoot, Vec<CompileError>> {
    let parse = parser::parse_module(text);
    let mut errors: Vec<CompileError> = parse
        .errors
        .iter()
        .map(|e| CompileError::Syntax {
            span: Span::new(file, e.range),
            message: e.message.clone(),
        })
        .collect();
    if !errors.is_empty() {
        return Err(errors);
    }

    let root = parser::Root::cast(parse.syntax()).expect("parse_module always yields a ROOT node");
    let mut stmts = root.statements();
    let top = match stmts.next() {
        Some(s) => s,
        None => {
            errors.push(CompileError::MissingHolder {
                span: Span::new(file, text_size::TextRange::empty(text_size::TextSize::from(0))),
                message: "file contains no module or submodule statement".into(),
            });
            return Err(errors);
        }
    };

    let mut ctx = LowerCtx {
        arena,
        file,
        errors,
    };

    let module_id = match top.keyword().as_str() {
        kw::MODULE => lower_module(&top, &mut ctx, false),
        kw::SUBMODULE => lower_module(&top, &mut ctx, true),
        other => {
            let span = ctx.span(&top);
            ctx.errors.push(CompileError::MissingHolder {
                span,
                message: format!("top-level statement must be 'module' or 'submodule', found '{other}'"),
            });
            return Err(ctx.errors);
        }
    };

    if ctx.errors.is_empty() {
        Ok(ModuleRoot { file, root: module_id })
    } else {
        Err(ctx.errors)
    }
}

fn lower_common(stmt: &Statement, ctx: &mut LowerCtx, node: NodeId) {
    let description = stmt.child(kw::DESCRIPTION).and_then(|s| s.argument());
    let reference = stmt.child(kw::REFERENCE).and_then(|s| s.argument());
    let status = stmt
        .child(kw::STATUS)
        .and_then(|s| s.argument())
        .map(|v| match v.as_str() {
            "deprecated" => Status::Deprecated,
            "obsolete" => Status::Obsolete,
            _ => Status::Current,
        })
        .unwrap_or_default();
    let when = stmt.child(kw::WHEN).and_then(|s| s.argument());
    let if_features = stmt
        .children_matching(kw::IF_FEATURE)
        .filter_map(|s| s.argument())
        .map(|expr_text| IfFeature {
            referenced: parse_feature_refs(&expr_text),
            expr_text,
        })
        .collect();
    let musts = stmt
        .children_matching(kw::MUST)
        .filter_map(|s| s.argument())
        .map(|xpath| MustConstraint {
            xpath,
            error_message: None,
            error_app_tag: None,
        })
        .collect();
    let n = ctx.arena.get_mut(node);
    n.common = CommonMeta {
        description,
        reference,
        status,
        when,
        if_features,
        musts,
    };
}

/// `if-feature` arguments may be boolean expressions over feature names
/// (`"foo and not bar"`); we only need the referenced identifiers for
/// resolution, the boolean structure itself is a runtime, not
/// compile-time, concern.
fn parse_feature_refs(expr: &str) -> Vec<FeatureRefTarget> {
    expr.split(|c: char| c.is_whitespace() || c == '(' || c == ')')
        .filter(|s| !s.is_empty() && *s != "and" && *s != "or" && *s != "not")
        .map(|tok| {
            let (prefix, local) = split_prefixed(tok);
            FeatureRefTarget {
                prefix,
                local_name: local,
                resolved: Resolvable::unresolved(),
            }
        })
        .collect()
}

fn split_prefixed(s: &str) -> (Option<Name>, Name) {
    match s.split_once(':') {
        Some((p, l)) => (Some(Name::new(p)), Name::new(l)),
        None => (None, Name::new(s)),
    }
}

fn lower_module(stmt: &Statement, ctx: &mut LowerCtx, is_submodule: bool) -> NodeId {
    let name = ctx.name_of(stmt);
    let span = ctx.span(stmt);
    let kind = if is_submodule {
        NodeKind::Submodule(ModuleData::default())
    } else {
        NodeKind::Module(ModuleData::default())
    };
    let id = ctx.arena.alloc(kind, Some(name), span);
    lower_common(stmt, ctx, id);

    let namespace_uri = stmt.child(kw::NAMESPACE).and_then(|s| s.argument()).map(Name::new);
    let prefix = stmt.child(kw::PREFIX).and_then(|s| s.argument()).map(Name::new);
    let yang_version = stmt.child(kw::YANG_VERSION).and_then(|s| s.argument());
    let belongs_to = stmt.child(kw::BELONGS_TO).and_then(|s| s.argument()).map(Name::new);

    let mut revisions = Vec::new();
    for r in stmt.children_matching(kw::REVISION) {
        let date = r.argument().unwrap_or_default();
        if !is_valid_date(&date) {
            ctx.errors.push(CompileError::InvalidDate {
                span: ctx.span(&r),
                text: date.clone(),
                reason: "expected YYYY-MM-DD, calendar-valid".into(),
            });
        }
        revisions.push(Revision {
            description: r.child(kw::DESCRIPTION).and_then(|s| s.argument()),
            reference: r.child(kw::REFERENCE).and_then(|s| s.argument()),
            date,
        });
    }

    let mut imports = Vec::new();
    for imp in stmt.children_matching(kw::IMPORT) {
        let module = ctx.name_of(&imp);
        let prefix = imp.child(kw::PREFIX).and_then(|s| s.argument()).map(Name::new);
        let revision_date = imp.child(kw::REVISION_DATE).and_then(|s| s.argument());
        if let Some(rd) = &revision_date {
            if !is_valid_date(rd) {
                ctx.errors.push(CompileError::InvalidDate {
                    span: ctx.span(&imp),
                    text: rd.clone(),
                    reason: "expected YYYY-MM-DD, calendar-valid".into(),
                });
            }
        }
        match prefix {
            Some(prefix) => imports.push(Import {
                module,
                prefix,
                revision_date,
                resolved_module: Resolvable::unresolved(),
            }),
            None => ctx.errors.push(CompileError::MissingHolder {
                span: ctx.span(&imp),
                message: format!("import '{module}' is missing a required 'prefix' statement"),
            }),
        }
    }

    let mut includes = Vec::new();
    for inc in stmt.children_matching(kw::INCLUDE) {
        let submodule = ctx.name_of(&inc);
        let revision_date = inc.child(kw::REVISION_DATE).and_then(|s| s.argument());
        includes.push(Include {
            submodule,
            revision_date,
            resolved: Resolvable::unresolved(),
        });
    }

    if let NodeKind::Module(data) | NodeKind::Submodule(data) = &mut ctx.arena.get_mut(id).kind {
        *data = ModuleData {
            namespace_uri,
            prefix,
            yang_version,
            revisions,
            imports,
            includes,
            belongs_to,
        };
    }

    lower_body_statements(stmt, ctx, id, "module");
    id
}

const DATA_TREE_TAG: &str = "module";

fn lower_body_statements(stmt: &Statement, ctx: &mut LowerCtx, parent: NodeId, parent_tag: &str) {
    let _ = DATA_TREE_TAG;
    for child in stmt.children() {
        if child.keyword_prefix().is_some() {
            lower_unknown(&child, ctx, parent);
            continue;
        }
        let keyword = child.keyword();
        let span = ctx.span(&child);
        match keyword.as_str() {
            kw::CONTAINER => {
                let id = lower_container(&child, ctx);
                attach(ctx, parent, id);
            }
            kw::LEAF => {
                let id = lower_leaf(&child, ctx);
                attach(ctx, parent, id);
            }
            kw::LEAF_LIST => {
                let id = lower_leaf_list(&child, ctx);
                attach(ctx, parent, id);
            }
            kw::LIST => {
                let id = lower_list(&child, ctx);
                attach(ctx, parent, id);
            }
            kw::CHOICE => {
                let id = lower_choice(&child, ctx);
                attach(ctx, parent, id);
            }
            kw::CASE => {
                if check_holder(parent_tag, &keyword, span, &mut ctx.errors) {
                    let id = lower_case(&child, ctx);
                    attach(ctx, parent, id);
                }
            }
            kw::GROUPING => {
                let id = lower_grouping(&child, ctx);
                attach(ctx, parent, id);
            }
            kw::USES => {
                let id = lower_uses(&child, ctx);
                attach(ctx, parent, id);
            }
            kw::AUGMENT => {
                let id = lower_augment(&child, ctx);
                attach(ctx, parent, id);
            }
            kw::TYPEDEF => {
                let id = lower_typedef(&child, ctx);
                attach(ctx, parent, id);
            }
            kw::IDENTITY => {
                if check_holder(parent_tag, &keyword, span, &mut ctx.errors) {
                    let id = lower_identity(&child, ctx);
                    attach(ctx, parent, id);
                }
            }
            kw::FEATURE => {
                if check_holder(parent_tag, &keyword, span, &mut ctx.errors) {
                    let id = lower_feature(&child, ctx);
                    attach(ctx, parent, id);
                }
            }
            kw::ANYXML => {
                let id = ctx.arena.alloc(NodeKind::Anyxml, Some(ctx.name_of(&child)), span);
                lower_common(&child, ctx, id);
                attach(ctx, parent, id);
            }
            kw::ANYDATA => {
                let id = ctx.arena.alloc(NodeKind::Anydata, Some(ctx.name_of(&child)), span);
                lower_common(&child, ctx, id);
                attach(ctx, parent, id);
            }
            kw::RPC | kw::ACTION => {
                let nk = if keyword == kw::RPC { NodeKind::Rpc } else { NodeKind::Action };
                let id = ctx.arena.alloc(nk, Some(ctx.name_of(&child)), span);
                lower_common(&child, ctx, id);
                lower_body_statements(&child, ctx, id, keyword.as_str());
                attach(ctx, parent, id);
            }
            kw::NOTIFICATION => {
                let id = ctx.arena.alloc(NodeKind::Notification, Some(ctx.name_of(&child)), span);
                lower_common(&child, ctx, id);
                lower_body_statements(&child, ctx, id, "notification");
                attach(ctx, parent, id);
            }
            kw::INPUT | kw::OUTPUT => {
                if check_holder(parent_tag, &keyword, span, &mut ctx.errors) {
                    let nk = if keyword == kw::INPUT { NodeKind::Input } else { NodeKind::Output };
                    let id = ctx.arena.alloc(nk, None, span);
                    lower_body_statements(&child, ctx, id, if keyword == kw::INPUT { "input" } else { "output" });
                    attach(ctx, parent, id);
                }
            }
            // Holder-restricted attribute statements: still just consumed by
            // the owning parent lowerer via `stmt.child(...)`, but a stray
            // occurrence under the wrong parent must still be flagged.
            kw::KEY | kw::REVISION_DATE => {
                check_holder(parent_tag, &keyword, span, &mut ctx.errors);
            }
            // Attribute-only keywords handled by the specific parent lowerer
            // (leaf/list/etc. read them directly via `stmt.child(...)`).
            kw::DESCRIPTION | kw::REFERENCE | kw::STATUS | kw::WHEN | kw::IF_FEATURE | kw::MUST
            | kw::DEFAULT | kw::UNITS | kw::MANDATORY | kw::CONFIG | kw::UNIQUE
            | kw::MIN_ELEMENTS | kw::MAX_ELEMENTS | kw::ORDERED_BY | kw::PRESENCE | kw::TYPE
            | kw::BASE | kw::NAMESPACE | kw::PREFIX | kw::YANG_VERSION | kw::IMPORT | kw::INCLUDE
            | kw::REVISION | kw::ORGANIZATION | kw::CONTACT | kw::BELONGS_TO
            | kw::PATTERN | kw::RANGE | kw::LENGTH | kw::ENUM | kw::BIT | kw::POSITION | kw::VALUE
            | kw::FRACTION_DIGITS | kw::PATH | kw::REQUIRE_INSTANCE | kw::REFINE
            | kw::ERROR_MESSAGE | kw::ERROR_APP_TAG => {}
            _ => {
                // Unsupported-but-legal or genuinely unknown statement.
                lower_unknown(&child, ctx, parent);
            }
        }
    }
}

fn attach(ctx: &mut LowerCtx, parent: NodeId, child: NodeId) {
    ctx.arena.append_child(parent, child);
}

fn lower_unknown(stmt: &Statement, ctx: &mut LowerCtx, parent: NodeId) {
    let span = ctx.span(stmt);
    let id = ctx.arena.alloc(NodeKind::Unknown, stmt.argument().map(Name::new), span);
    attach(ctx, parent, id);
}

fn lower_container(stmt: &Statement, ctx: &mut LowerCtx) -> NodeId {
    let span = ctx.span(stmt);
    let id = ctx.arena.alloc(NodeKind::Container(ContainerData::default()), Some(ctx.name_of(stmt)), span);
    lower_common(stmt, ctx, id);
    let presence = stmt.child(kw::PRESENCE).and_then(|s| s.argument());
    let config = stmt.child(kw::CONFIG).and_then(|s| s.argument()).and_then(|v| parse_bool(&v));
    if let NodeKind::Container(data) = &mut ctx.arena.get_mut(id).kind {
        data.presence = presence;
        data.config = config;
    }
    lower_body_statements(stmt, ctx, id, "container");
    id
}

fn lower_list(stmt: &Statement, ctx: &mut LowerCtx) -> NodeId {
    let span = ctx.span(stmt);
    let id = ctx.arena.alloc(NodeKind::List(ListData::default()), Some(ctx.name_of(stmt)), span);
    lower_common(stmt, ctx, id);

    let key_stmt = stmt.child(kw::KEY);
    let mut key = Vec::new();
    if let Some(key_stmt) = &key_stmt {
        let mut seen = rustc_hash::FxHashSet::default();
        for tok in key_stmt.argument().unwrap_or_default().split_whitespace() {
            let name = Name::new(tok);
            if !seen.insert(name.clone()) {
                ctx.errors.push(CompileError::InvalidKey {
                    span: ctx.span(key_stmt),
                    name: format!("duplicate key leaf '{name}'"),
                });
                continue;
            }
            key.push(name);
        }
    }
    let unique = stmt
        .children_matching(kw::UNIQUE)
        .filter_map(|s| s.argument())
        .map(|arg| arg.split_whitespace().map(Name::new).collect())
        .collect();
    let min_elements = stmt.child(kw::MIN_ELEMENTS).and_then(|s| s.argument()).and_then(|v| v.parse().ok());
    let max_elements = stmt
        .child(kw::MAX_ELEMENTS)
        .and_then(|s| s.argument())
        .filter(|v| v != "unbounded")
        .and_then(|v| v.parse().ok());
    let config = stmt.child(kw::CONFIG).and_then(|s| s.argument()).and_then(|v| parse_bool(&v));
    let ordered_by = stmt
        .child(kw::ORDERED_BY)
        .and_then(|s| s.argument())
        .map(|v| if v == "user" { OrderedBy::User } else { OrderedBy::System })
        .unwrap_or_default();

    if config == Some(true) && key.is_empty() {
        ctx.errors.push(CompileError::InvalidKey {
            span,
            name: ctx.arena.get(id).name.clone().map(|n| n.to_string()).unwrap_or_default(),
        });
    }

    let key_names = key.clone();
    if let NodeKind::List(data) = &mut ctx.arena.get_mut(id).kind {
        *data = ListData {
            key,
            unique,
            min_elements,
            max_elements,
            config,
            ordered_by,
        };
    }
    lower_body_statements(stmt, ctx, id, "list");

    // A `uses` body statement isn't expanded until the resolver runs, so a
    // key naming a leaf that arrives through it can't be checked yet.
    let has_unresolved_uses = stmt.children_matching(kw::USES).next().is_some();
    if !has_unresolved_uses {
        for key_name in &key_names {
            let child = ctx.arena.children(id).find(|&c| ctx.arena.get(c).name.as_ref() == Some(key_name));
            let leaf = child.and_then(|c| match &ctx.arena.get(c).kind {
                NodeKind::Leaf(data) => Some(data.clone()),
                _ => None,
            });
            let Some(leaf) = leaf else {
                ctx.errors.push(CompileError::InvalidKey {
                    span,
                    name: format!("key '{key_name}' does not name a direct child leaf"),
                });
                continue;
            };
            if matches!(leaf.type_ref, TypeRef::Builtin(BuiltinType::Empty, _)) {
                ctx.errors.push(CompileError::InvalidKey {
                    span,
                    name: format!("key leaf '{key_name}' must not be of type 'empty'"),
                });
            }
            if let (Some(list_cfg), Some(leaf_cfg)) = (config, leaf.config) {
                if list_cfg != leaf_cfg {
                    ctx.errors.push(CompileError::InvalidKey {
                        span,
                        name: format!("key leaf '{key_name}' must share the list's 'config' value"),
                    });
                }
            }
        }
    }
    id
}

fn lower_choice(stmt: &Statement, ctx: &mut LowerCtx) -> NodeId {
    let span = ctx.span(stmt);
    let id = ctx.arena.alloc(NodeKind::Choice(ChoiceData::default()), Some(ctx.name_of(stmt)), span);
    lower_common(stmt, ctx, id);
    let default_case = stmt.child(kw::DEFAULT).and_then(|s| s.argument()).map(Name::new);
    let mandatory = stmt
        .child(kw::MANDATORY)
        .and_then(|s| s.argument())
        .and_then(|v| parse_bool(&v))
        .unwrap_or(false);
    if default_case.is_some() && mandatory {
        ctx.errors.push(CompileError::InvalidDefaultCase {
            span,
            case: "a mandatory choice must not declare a default case".into(),
        });
    }
    if let NodeKind::Choice(data) = &mut ctx.arena.get_mut(id).kind {
        data.default_case = default_case;
        data.mandatory = mandatory;
    }
    // Bare `leaf`/`container`/etc. directly under `choice` are short-hand
    // cases; wrap each in an implicit `case` node so downstream logic
    // (collision scope, default-case lookup) only ever deals with cases.
    for child in stmt.children() {
        if child.keyword_prefix().is_some() {
            lower_unknown(&child, ctx, id);
            continue;
        }
        match child.keyword().as_str() {
            kw::CASE => {
                let case_id = lower_case(&child, ctx);
                attach(ctx, id, case_id);
            }
            kw::CONTAINER | kw::LEAF | kw::LEAF_LIST | kw::LIST | kw::CHOICE | kw::ANYXML | kw::ANYDATA => {
                let case_span = ctx.span(&child);
                let name = ctx.name_of(&child);
                let case_id = ctx.arena.alloc(NodeKind::Case, Some(name), case_span);
                lower_body_statements_single(&child, ctx, case_id);
                attach(ctx, id, case_id);
            }
            _ => {}
        }
    }
    if let NodeKind::Choice(data) = &ctx.arena.get(id).kind {
        if let Some(default) = data.default_case.clone() {
            let names_a_case = ctx.arena.children(id).any(|case_id| ctx.arena.get(case_id).name.as_ref() == Some(&default));
            if !names_a_case {
                ctx.errors.push(CompileError::InvalidDefaultCase {
                    span,
                    case: default.to_string(),
                });
            }
        }
    }
    id
}

/// Lower exactly one data-definition statement as the sole (implicit)
/// child of a synthesized `case` node.
fn lower_body_statements_single(stmt: &Statement, ctx: &mut LowerCtx, case_id: NodeId) {
    let node_id = match stmt.keyword().as_str() {
        kw::CONTAINER => lower_container(stmt, ctx),
        kw::LEAF => lower_leaf(stmt, ctx),
        kw::LEAF_LIST => lower_leaf_list(stmt, ctx),
        kw::LIST => lower_list(stmt, ctx),
        kw::CHOICE => lower_choice(stmt, ctx),
        kw::ANYXML => {
            let span = ctx.span(stmt);
            let id = ctx.arena.alloc(NodeKind::Anyxml, Some(ctx.name_of(stmt)), span);
            lower_common(stmt, ctx, id);
            id
        }
        kw::ANYDATA => {
            let span = ctx.span(stmt);
            let id = ctx.arena.alloc(NodeKind::Anydata, Some(ctx.name_of(stmt)), span);
            lower_common(stmt, ctx, id);
            id
        }
        _ => unreachable!("only called for short-hand case bodies"),
    };
    attach(ctx, case_id, node_id);
}

fn lower_case(stmt: &Statement, ctx: &mut LowerCtx) -> NodeId {
    let span = ctx.span(stmt);
    let id = ctx.arena.alloc(NodeKind::Case, Some(ctx.name_of(stmt)), span);
    lower_common(stmt, ctx, id);
    lower_body_statements(stmt, ctx, id, "case");
    id
}

fn lower_grouping(stmt: &Statement, ctx: &mut LowerCtx) -> NodeId {
    let span = ctx.span(stmt);
    let id = ctx.arena.alloc(NodeKind::Grouping, Some(ctx.name_of(stmt)), span);
    lower_common(stmt, ctx, id);
    lower_body_statements(stmt, ctx, id, "grouping");
    id
}

fn lower_uses(stmt: &Statement, ctx: &mut LowerCtx) -> NodeId {
    let span = ctx.span(stmt);
    let arg = stmt.argument().unwrap_or_default();
    let (grouping_prefix, grouping_name) = split_prefixed(&arg);

    let mut refines = Vec::new();
    for refine_stmt in stmt.children_matching(kw::REFINE) {
        let path: Vec<Name> = refine_stmt
            .argument()
            .unwrap_or_default()
            .split('/')
            .filter(|s| !s.is_empty())
            .map(Name::new)
            .collect();
        refines.push(Refine {
            path,
            default: refine_stmt
                .children_matching(kw::DEFAULT)
                .filter_map(|s| s.argument())
                .map(|v| vec![v])
                .next(),
            description: refine_stmt.child(kw::DESCRIPTION).and_then(|s| s.argument()),
            reference: refine_stmt.child(kw::REFERENCE).and_then(|s| s.argument()),
            config: refine_stmt.child(kw::CONFIG).and_then(|s| s.argument()).and_then(|v| parse_bool(&v)),
            mandatory: refine_stmt.child(kw::MANDATORY).and_then(|s| s.argument()).and_then(|v| parse_bool(&v)),
            min_elements: refine_stmt.child(kw::MIN_ELEMENTS).and_then(|s| s.argument()).and_then(|v| v.parse().ok()),
            max_elements: refine_stmt.child(kw::MAX_ELEMENTS).and_then(|s| s.argument()).and_then(|v| v.parse().ok()),
            presence: refine_stmt.child(kw::PRESENCE).and_then(|s| s.argument()),
            musts: refine_stmt
                .children_matching(kw::MUST)
                .filter_map(|s| s.argument())
                .map(|xpath| MustConstraint {
                    xpath,
                    error_message: None,
                    error_app_tag: None,
                })
                .collect(),
        });
    }

    let inline_augments: Vec<Statement> = stmt.children_matching(kw::AUGMENT).collect();

    let id = ctx.arena.alloc(
        NodeKind::Uses(UsesData {
            grouping_prefix,
            grouping_name,
            resolved_grouping: Resolvable::unresolved(),
            refines,
            inline_augments,
        }),
        Some(Name::new(arg)),
        span,
    );
    lower_common(stmt, ctx, id);
    id
}

fn lower_augment(stmt: &Statement, ctx: &mut LowerCtx) -> NodeId {
    let span = ctx.span(stmt);
    let arg = stmt.argument().unwrap_or_default();
    let absolute = arg.starts_with('/');
    let target_path = arg
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|seg| {
            let (prefix, name) = split_prefixed(seg);
            AugmentTargetSegment::Child { prefix, name }
        })
        .collect();
    let id = ctx.arena.alloc(
        NodeKind::Augment(AugmentData {
            absolute,
            target_path,
            resolved_target: Resolvable::unresolved(),
            augmenting_module: None,
        }),
        Some(Name::new(arg)),
        span,
    );
    lower_common(stmt, ctx, id);
    lower_body_statements(stmt, ctx, id, "augment");
    id
}

fn lower_typedef(stmt: &Statement, ctx: &mut LowerCtx) -> NodeId {
    let span = ctx.span(stmt);
    let type_stmt = stmt.child(kw::TYPE);
    let type_ref = type_stmt
        .as_ref()
        .map(|t| lower_type_ref(t, ctx))
        .unwrap_or(TypeRef::Builtin(BuiltinType::String, Restrictions::default()));
    let id = ctx.arena.alloc(
        NodeKind::Typedef(TypedefData {
            type_ref,
            default: stmt.child(kw::DEFAULT).and_then(|s| s.argument()),
            units: stmt.child(kw::UNITS).and_then(|s| s.argument()),
        }),
        Some(ctx.name_of(stmt)),
        span,
    );
    lower_common(stmt, ctx, id);
    id
}

fn lower_leaf(stmt: &Statement, ctx: &mut LowerCtx) -> NodeId {
    let span = ctx.span(stmt);
    let type_stmt = stmt.child(kw::TYPE);
    let type_ref = type_stmt
        .as_ref()
        .map(|t| lower_type_ref(t, ctx))
        .unwrap_or(TypeRef::Builtin(BuiltinType::String, Restrictions::default()));
    let id = ctx.arena.alloc(
        NodeKind::Leaf(LeafData {
            type_ref,
            default: stmt.child(kw::DEFAULT).and_then(|s| s.argument()),
            units: stmt.child(kw::UNITS).and_then(|s| s.argument()),
            mandatory: stmt
                .child(kw::MANDATORY)
                .and_then(|s| s.argument())
                .and_then(|v| parse_bool(&v))
                .unwrap_or(false),
            config: stmt.child(kw::CONFIG).and_then(|s| s.argument()).and_then(|v| parse_bool(&v)),
        }),
        Some(ctx.name_of(stmt)),
        span,
    );
    lower_common(stmt, ctx, id);
    id
}

fn lower_leaf_list(stmt: &Statement, ctx: &mut LowerCtx) -> NodeId {
    let span = ctx.span(stmt);
    let type_stmt = stmt.child(kw::TYPE);
    let type_ref = type_stmt
        .as_ref()
        .map(|t| lower_type_ref(t, ctx))
        .unwrap_or(TypeRef::Builtin(BuiltinType::String, Restrictions::default()));
    let default = stmt.children_matching(kw::DEFAULT).filter_map(|s| s.argument()).collect();
    let ordered_by = stmt
        .child(kw::ORDERED_BY)
        .and_then(|s| s.argument())
        .map(|v| if v == "user" { OrderedBy::User } else { OrderedBy::System })
        .unwrap_or_default();
    let id = ctx.arena.alloc(
        NodeKind::LeafList(LeafListData {
            type_ref,
            default,
            units: stmt.child(kw::UNITS).and_then(|s| s.argument()),
            min_elements: stmt.child(kw::MIN_ELEMENTS).and_then(|s| s.argument()).and_then(|v| v.parse().ok()),
            max_elements: stmt
                .child(kw::MAX_ELEMENTS)
                .and_then(|s| s.argument())
                .filter(|v| v != "unbounded")
                .and_then(|v| v.parse().ok()),
            config: stmt.child(kw::CONFIG).and_then(|s| s.argument()).and_then(|v| parse_bool(&v)),
            ordered_by,
        }),
        Some(ctx.name_of(stmt)),
        span,
    );
    lower_common(stmt, ctx, id);
    id
}

fn lower_identity(stmt: &Statement, ctx: &mut LowerCtx) -> NodeId {
    let span = ctx.span(stmt);
    let bases = stmt
        .children_matching(kw::BASE)
        .filter_map(|s| s.argument())
        .map(|arg| {
            let (prefix, local_name) = split_prefixed(&arg);
            IdentityRefTarget {
                prefix,
                local_name,
                resolved: Resolvable::unresolved(),
            }
        })
        .collect();
    let id = ctx.arena.alloc(NodeKind::Identity(IdentityData { bases }), Some(ctx.name_of(stmt)), span);
    lower_common(stmt, ctx, id);
    id
}

fn lower_feature(stmt: &Statement, ctx: &mut LowerCtx) -> NodeId {
    let span = ctx.span(stmt);
    let id = ctx.arena.alloc(NodeKind::Feature(FeatureData::default()), Some(ctx.name_of(stmt)), span);
    lower_common(stmt, ctx, id);
    id
}

fn lower_type_ref(type_stmt: &Statement, ctx: &mut LowerCtx) -> TypeRef {
    let arg = type_stmt.argument().unwrap_or_default();
    let (prefix, local_name) = split_prefixed(&arg);
    let mut restrictions = Restrictions {
        range: type_stmt.child(kw::RANGE).and_then(|s| s.argument()),
        length: type_stmt.child(kw::LENGTH).and_then(|s| s.argument()),
        patterns: type_stmt.children_matching(kw::PATTERN).filter_map(|s| s.argument()).collect(),
        fraction_digits: type_stmt.child(kw::FRACTION_DIGITS).and_then(|s| s.argument()).and_then(|v| v.parse().ok()),
        path: type_stmt.child(kw::PATH).and_then(|s| s.argument()),
        require_instance: type_stmt
            .child(kw::REQUIRE_INSTANCE)
            .and_then(|s| s.argument())
            .and_then(|v| parse_bool(&v)),
        enum_values: type_stmt
            .children_matching(kw::ENUM)
            .map(|e| EnumValue {
                name: Name::new(e.argument().unwrap_or_default()),
                value: e.child(kw::VALUE).and_then(|s| s.argument()).and_then(|v| v.parse().ok()),
            })
            .collect(),
        bits: type_stmt
            .children_matching(kw::BIT)
            .map(|b| BitValue {
                name: Name::new(b.argument().unwrap_or_default()),
                position: b.child(kw::POSITION).and_then(|s| s.argument()).and_then(|v| v.parse().ok()),
            })
            .collect(),
        union_members: type_stmt
            .children_matching(kw::TYPE)
            .map(|t| lower_type_ref(&t, ctx))
            .collect(),
        base_identities: type_stmt
            .children_matching(kw::BASE)
            .filter_map(|s| s.argument())
            .map(|a| {
                let (p, l) = split_prefixed(&a);
                IdentityRefTarget {
                    prefix: p,
                    local_name: l,
                    resolved: Resolvable::unresolved(),
                }
            })
            .collect(),
    };

    if let Some(builtin) = prefix.is_none().then(|| BuiltinType::from_name(local_name.as_str())).flatten() {
        if !matches!(builtin, BuiltinType::Union) {
            restrictions.union_members.clear();
        }
        return TypeRef::Builtin(builtin, restrictions);
    }
    TypeRef::Derived {
        prefix,
        local_name,
        resolved: Resolvable::unresolved(),
        restrictions,
    }
}

/// Lower one `augment` statement captured verbatim inside a `uses`
/// (its target is resolved relative to the grouping's clone, not at
/// parse time), used by the resolver once the clone exists.
pub fn lower_statement_as_augment(file: FileId, stmt: &Statement, arena: &mut SchemaArena) -> (NodeId, Vec<CompileError>) {
    let mut ctx = LowerCtx {
        arena,
        file,
        errors: Vec::new(),
    };
    let id = lower_augment(stmt, &mut ctx);
    (id, ctx.errors)
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// A revision or import revision-date: `YYYY-MM-DD`, calendar-valid.
pub fn is_valid_date(s: &str) -> bool {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::FileId;

    #[test]
    fn lowers_module_with_leaf() {
        let mut arena = SchemaArena::new();
        let result = lower_file(
            FileId::new(0),
            r#"module m {
                namespace "urn:m";
                prefix m;
                leaf-list foo { type string; ordered-by user; }
            }"#,
            &mut arena,
        );
        let root = result.unwrap();
        let module = arena.get(root.root);
        assert!(matches!(module.kind, NodeKind::Module(_)));
        let leaf_list_id = arena.children(root.root).next().unwrap();
        match &arena.get(leaf_list_id).kind {
            NodeKind::LeafList(data) => assert_eq!(data.ordered_by, OrderedBy::User),
            other => panic!("expected leaf-list, got {other:?}"),
        }
    }

    #[test]
    fn rejects_case_outside_choice() {
        let mut arena = SchemaArena::new();
        let err = lower_file(
            FileId::new(0),
            r#"module m {
                namespace "urn:m";
                prefix m;
                container c { case bogus { leaf x { type string; } } }
            }"#,
            &mut arena,
        )
        .unwrap_err();
        assert!(err.iter().any(|e| matches!(e, CompileError::InvalidHolder { .. })));
    }
}
