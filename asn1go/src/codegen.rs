//! Go source generation for a resolved module.  The output targets the
//! `encoding/asn1` package of the Go standard library.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Write,
};

use convert_case::{Case, Casing};
use thiserror::Error;
use tracing::debug;

use crate::{
    analysis::{
        Builtin, Classification, Field, ResolvedAssignment, ResolvedModule, ResolvedType,
        ResolvedValue,
    },
    ast::{StringKind, TagClass, TimeKind},
    compiler::{IntegerRepr, Options},
};

#[derive(Debug, Error)]
pub enum CodegenError {
    /// Two names in the same scope render to the same Go identifier
    #[error("`{first}` and `{second}` would both be generated as `{generated}`")]
    NameCollision {
        generated: String,
        first: String,
        second: String,
    },

    /// The output sink refused a write
    #[error("failed to write generated code")]
    Fmt(#[from] std::fmt::Error),
}

type Result<T = (), E = CodegenError> = std::result::Result<T, E>;

/// Distance between tab stops when aligning struct fields
const TAB_WIDTH: usize = 8;

/// Write Go declarations for a resolved module to `out`.  Each declaration is
/// rendered completely before it is written, so a failure never leaves half
/// of a declaration in the output.
pub fn generate(module: &ResolvedModule<'_>, options: &Options, out: &mut impl Write) -> Result {
    GoCodegen { module, options }.run(out)
}

/// Generate go source code from a resolved module
#[derive(Debug, Clone, Copy)]
struct GoCodegen<'m, 'a> {
    module: &'m ResolvedModule<'a>,
    options: &'m Options,
}

impl GoCodegen<'_, '_> {
    fn run(self, out: &mut impl Write) -> Result {
        self.check_names()?;

        let package = self.options.package.as_deref().unwrap_or(self.module.name);
        writeln!(out, "package {}", sanitize_package(package))?;

        let imports: Vec<_> = self.imports().into_iter().collect();
        match imports.as_slice() {
            [] => (),
            [path] => write!(out, "\nimport \"{path}\"\n")?,
            paths => {
                let mut block = String::from("\nimport (\n");
                for path in paths {
                    writeln!(block, "\t\"{path}\"")?;
                }
                block.push_str(")\n");
                out.write_str(&block)?;
            }
        }

        for assignment in &self.module.assignments {
            let declaration = self.declaration(assignment)?;
            out.write_char('\n')?;
            out.write_str(&declaration)?;
        }

        debug!(
            declarations = self.module.assignments.len(),
            imports = imports.len(),
            "generated module"
        );

        Ok(())
    }

    /// Check that no two top level declarations end up with the same name
    fn check_names(&self) -> Result {
        let mut names = BTreeMap::new();
        let mut declare = |generated: String, source: &str| {
            match names.insert(generated.clone(), source.to_string()) {
                Some(first) => Err(CodegenError::NameCollision {
                    generated,
                    first,
                    second: source.to_string(),
                }),
                None => Ok(()),
            }
        };

        for assignment in &self.module.assignments {
            match assignment {
                ResolvedAssignment::Type {
                    name,
                    ty,
                    constants,
                    ..
                } => {
                    declare(type_name(name), name)?;
                    if matches!(ty, ResolvedType::Set(_)) {
                        declare(set_name(name), name)?;
                    }
                    for constant in constants {
                        declare(constant_name(name, constant.name), constant.name)?;
                    }
                }
                ResolvedAssignment::Value { name, .. } => declare(value_name(name), name)?,
            }
        }

        Ok(())
    }

    /// All packages the generated code needs, sorted
    fn imports(&self) -> BTreeSet<&'static str> {
        let mut imports = BTreeSet::new();
        for assignment in &self.module.assignments {
            match assignment {
                ResolvedAssignment::Type { ty, .. } | ResolvedAssignment::Value { ty, .. } => {
                    self.type_imports(ty, &mut imports)
                }
            }
        }

        imports
    }

    fn type_imports(&self, ty: &ResolvedType<'_>, imports: &mut BTreeSet<&'static str>) {
        match ty {
            ResolvedType::Builtin(builtin) => match builtin {
                Builtin::Time(_) => {
                    imports.insert("time");
                }
                Builtin::BitString | Builtin::ObjectIdentifier | Builtin::Enumerated => {
                    imports.insert("encoding/asn1");
                }
                Builtin::Integer if self.options.integer_repr == IntegerRepr::BigInt => {
                    imports.insert("math/big");
                }
                _ => (),
            },
            ResolvedType::Named { .. } => (),
            ResolvedType::Sequence(fields) | ResolvedType::Set(fields) => {
                for field in fields {
                    self.type_imports(&field.ty, imports);
                }
            }
            ResolvedType::SequenceOf(element) | ResolvedType::SetOf(element) => {
                self.type_imports(element, imports)
            }
        }
    }

    /// Render a single top level declaration, including its trailing newline
    fn declaration(&self, assignment: &ResolvedAssignment<'_>) -> Result<String> {
        let mut out = String::new();

        match assignment {
            ResolvedAssignment::Type {
                name,
                ty,
                constants,
                ..
            } => {
                let type_name = type_name(name);
                match ty {
                    ResolvedType::Sequence(fields) => {
                        writeln!(out, "type {type_name} {}", self.structure(fields, 0)?)?;
                    }
                    ResolvedType::Set(fields) => {
                        // encoding/asn1 treats any struct whose name ends in SET as a SET
                        let set_name = set_name(name);
                        writeln!(out, "type (")?;
                        writeln!(out, "\t{set_name}\t{}", self.structure(fields, 1)?)?;
                        writeln!(out, "\t{type_name}\t= {set_name}")?;
                        writeln!(out, ")")?;
                    }
                    _ => writeln!(out, "type {type_name} = {}", self.go_type(ty, 0)?)?,
                }

                if !constants.is_empty() {
                    writeln!(out, "\nvar (")?;
                    for constant in constants {
                        writeln!(
                            out,
                            "\t{} {type_name} = {}",
                            constant_name(name, constant.name),
                            self.value(&constant.value, ty)
                        )?;
                    }
                    writeln!(out, ")")?;
                }
            }
            ResolvedAssignment::Value { name, ty, value } => {
                writeln!(
                    out,
                    "var {} {} = {}",
                    value_name(name),
                    self.go_type(ty, 0)?,
                    self.value(value, ty)
                )?;
            }
        }

        Ok(out)
    }

    /// Render a type as used in a declaration or a field.  `depth` is the
    /// indentation of the line the type starts on.
    fn go_type(&self, ty: &ResolvedType<'_>, depth: usize) -> Result<String> {
        Ok(match ty {
            ResolvedType::Builtin(builtin) => self.builtin(*builtin).to_string(),
            ResolvedType::Named { name, .. } => type_name(name),
            ResolvedType::Sequence(fields) | ResolvedType::Set(fields) => {
                self.structure(fields, depth)?
            }
            ResolvedType::SequenceOf(element) | ResolvedType::SetOf(element) => {
                format!("[]{}", self.go_type(element, depth)?)
            }
        })
    }

    fn builtin(&self, builtin: Builtin) -> &'static str {
        match builtin {
            Builtin::Boolean => "bool",
            Builtin::Integer => match self.options.integer_repr {
                IntegerRepr::Int64 => "int64",
                IntegerRepr::BigInt => "*big.Int",
            },
            Builtin::Real => "float64",
            Builtin::OctetString => "[]byte",
            Builtin::BitString => "asn1.BitString",
            Builtin::String(_) => "string",
            Builtin::Time(_) => "time.Time",
            Builtin::ObjectIdentifier => "asn1.ObjectIdentifier",
            Builtin::Enumerated => "asn1.Enumerated",
        }
    }

    /// Anonymous struct with one field per line.  Fields of a struct with more
    /// than one field are aligned into columns with tabs.
    fn structure(&self, fields: &[Field<'_>], depth: usize) -> Result<String> {
        if fields.is_empty() {
            return Ok("struct{}".to_string());
        }

        let indent = "\t".repeat(depth + 1);
        let mut names = BTreeMap::new();
        let mut rows = Vec::with_capacity(fields.len());

        for field in fields {
            let name = type_name(field.name);
            if let Some(first) = names.insert(name.clone(), field.name) {
                return Err(CodegenError::NameCollision {
                    generated: name,
                    first: first.to_string(),
                    second: field.name.to_string(),
                });
            }

            let ty = self.go_type(&field.ty, depth + 1)?;
            let directive = directive(field).map(|d| format!("`asn1:\"{d}\"`"));
            rows.push((name, ty, directive));
        }

        let mut out = String::from("struct {\n");

        if let [(name, ty, directive)] = rows.as_slice() {
            write!(out, "{indent}{name} {ty}")?;
            if let Some(directive) = directive {
                write!(out, " {directive}")?;
            }
            out.push('\n');
        } else {
            let multiline: Vec<_> = rows.iter().map(|(_, ty, _)| ty.contains('\n')).collect();
            let name_cells: Vec<_> = rows.iter().map(|(name, _, _)| Some(name.len())).collect();
            let type_cells: Vec<_> = rows
                .iter()
                .zip(&multiline)
                .map(|((_, ty, directive), multiline)| {
                    (directive.is_some() && !multiline).then_some(ty.len())
                })
                .collect();

            let name_tabs = align(&name_cells, &multiline);
            let type_tabs = align(&type_cells, &multiline);

            for (i, (name, ty, directive)) in rows.iter().enumerate() {
                write!(out, "{indent}{name}{}{ty}", "\t".repeat(name_tabs[i]))?;
                if let Some(directive) = directive {
                    write!(out, "{}{directive}", "\t".repeat(type_tabs[i].max(1)))?;
                }
                out.push('\n');
            }
        }

        write!(out, "{}}}", "\t".repeat(depth))?;
        Ok(out)
    }

    /// Render a value for a declaration of the given type
    fn value(&self, value: &ResolvedValue<'_>, ty: &ResolvedType<'_>) -> String {
        match value {
            ResolvedValue::Number(n) => {
                let big = self.options.integer_repr == IntegerRepr::BigInt
                    && *ty == ResolvedType::Builtin(Builtin::Integer);
                if big {
                    format!("big.NewInt({n})")
                } else {
                    n.to_string()
                }
            }
            ResolvedValue::Boolean(b) => b.to_string(),
            ResolvedValue::Real(r) => format!("{r:?}"),
            ResolvedValue::String(s) => go_quote(s),
            ResolvedValue::Reference(name) => value_name(name),
        }
    }
}

/// Pad one column of cells to a shared tab stop, returning the number of tabs
/// after each cell.  `cells` holds the width of each row's cell, `None` where
/// a row has no cell in this column.  Consecutive cells share a stop, a row
/// spanning several lines ends the run after its own cell.
fn align(cells: &[Option<usize>], multiline: &[bool]) -> Vec<usize> {
    let mut tabs = vec![0; cells.len()];
    let mut start = 0;

    while start < cells.len() {
        if cells[start].is_none() {
            start += 1;
            continue;
        }

        let mut end = start;
        while end < cells.len() && cells[end].is_some() {
            end += 1;
            if multiline[end - 1] {
                break;
            }
        }

        let widest = cells[start..end].iter().flatten().copied().max().unwrap_or(0);
        let stop = (widest + 1).div_ceil(TAB_WIDTH) * TAB_WIDTH;
        for (tabs, width) in tabs[start..end].iter_mut().zip(&cells[start..end]) {
            if let Some(width) = width {
                *tabs = (stop - width).div_ceil(TAB_WIDTH);
            }
        }

        start = end;
    }

    tabs
}

/// The `asn1:"..."` flags of a field, if it needs any
fn directive(field: &Field<'_>) -> Option<String> {
    let mut flags = vec![];

    if field.optional {
        flags.push("optional".to_string());
    }

    if let Some(tag) = field.tag {
        if tag.explicit {
            flags.push("explicit".to_string());
        }
        match tag.class {
            TagClass::Application => flags.push("application".to_string()),
            TagClass::Private => flags.push("private".to_string()),
            TagClass::ContextSpecific | TagClass::Universal => (),
        }
        flags.push(format!("tag:{}", tag.number));
    }

    if let Some(default) = field.default {
        flags.push(format!("default:{default}"));
    }

    let kind = match &field.ty {
        ResolvedType::Builtin(Builtin::String(Some(kind))) => match kind {
            StringKind::IA5 => Some("ia5"),
            StringKind::UTF8 => Some("utf8"),
            StringKind::Printable => Some("printable"),
            StringKind::Numeric => Some("numeric"),
            _ => None,
        },
        ResolvedType::Builtin(Builtin::Time(TimeKind::Generalized)) => Some("generalized"),
        ResolvedType::Builtin(Builtin::Time(TimeKind::Utc)) => Some("utc"),
        ResolvedType::SetOf(_)
        | ResolvedType::Named {
            class: Classification::List { set: true },
            ..
        } => Some("set"),
        _ => None,
    };
    flags.extend(kind.map(str::to_string));

    if flags.is_empty() {
        None
    } else {
        Some(flags.join(","))
    }
}

fn type_name(name: &str) -> String {
    name.to_case(Case::Pascal)
}

fn set_name(name: &str) -> String {
    format!("{}SET", type_name(name))
}

fn value_name(name: &str) -> String {
    format!("Val{}", type_name(name))
}

fn constant_name(ty: &str, name: &str) -> String {
    format!("{}Val{}", type_name(ty), type_name(name))
}

/// Replace everything that cannot appear in a package name
fn sanitize_package(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Quote a string as a Go interpreted string literal
fn go_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
