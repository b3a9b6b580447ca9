// SPDX: CC0-1.0

//! JSON documents holding a whole workspace:
//!
//! ```json
//! {
//!     "functionList": [
//!         {
//!             "name": "f",
//!             "type": "linear",
//!             "constants": { "a": 2.0, "b": 1.5 },
//!             "domain": [-3.0, 3.0],
//!             "valuesX": [-3.0, -2.75, ...],
//!             "valuesY": [-4.5, -4.0, ...]
//!         }
//!     ]
//! }
//! ```
//!
//! `valuesX` and `valuesY` are written for readers of the file but never read
//! back: decoding rebuilds every function from its type, constants and domain.
//! Samples that are not finite are written as `null`. Constants and domain
//! boundaries are read back, so they must be finite to be written at all.

use crate::{
    catalog::{Constants, FunctionTyp, MissingConstantErr},
    function::{Domain, Function},
    workspace::Workspace,
    Number,
};
use serde::{Deserialize, Serialize};
use serde_json::{ser::PrettyFormatter, Value};
use std::io;
use thiserror::Error;

const INDENT: &[u8] = b"    ";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WorkspaceDoc<'a> {
    function_list: Vec<FunctionDoc<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FunctionDoc<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    typ: &'a FunctionTyp,
    constants: &'a Constants,
    domain: Domain,
    values_x: &'a [Number],
    values_y: &'a [Number],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkspaceDef {
    function_list: Vec<Value>,
}

#[derive(Deserialize)]
struct FunctionDef {
    name: String,
    #[serde(rename = "type")]
    typ: FunctionTyp,
    constants: Constants,
    domain: Domain,
}

#[derive(Debug, Error)]
pub enum MalformedTyp {
    #[error("not a workspace document: {0}")]
    Document(serde_json::Error),
    #[error("{0}")]
    Entry(serde_json::Error),
    #[error("{0}")]
    Constants(MissingConstantErr),
}

#[derive(Debug, Error)]
#[error("malformed workspace document{}: {typ}", entry_suffix(.entry))]
pub struct MalformedDocument {
    pub typ: MalformedTyp,
    /// Index into `functionList` of the offending entry, if any.
    pub entry: Option<usize>,
}

/// Why a workspace could not be written.
#[derive(Debug, Error)]
pub enum EncodeErr {
    #[error("function '{name}' has non-finite {field} {value}, which a document cannot hold")]
    NonFinite {
        name: String,
        field: String,
        value: Number,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn entry_suffix(entry: &Option<usize>) -> String {
    match entry {
        Some(i) => format!(" (function entry {i})"),
        None => String::new(),
    }
}

fn require_finite(name: &str, function: &Function) -> Result<(), EncodeErr> {
    let non_finite = |field: String, value: Number| EncodeErr::NonFinite {
        name: name.to_string(),
        field,
        value,
    };

    for (c, &value) in function.constants() {
        if !value.is_finite() {
            return Err(non_finite(format!("constant '{c}'"), value));
        }
    }
    let Domain { left, right } = function.domain();
    for (side, value) in [("left", left), ("right", right)] {
        if !value.is_finite() {
            return Err(non_finite(format!("{side} boundary"), value));
        }
    }
    Ok(())
}

fn doc(workspace: &Workspace) -> Result<WorkspaceDoc<'_>, EncodeErr> {
    let function_list = workspace
        .iter()
        .map(|(name, function)| {
            require_finite(name, function)?;
            Ok::<_, EncodeErr>(FunctionDoc {
                name,
                typ: function.typ(),
                constants: function.constants(),
                domain: function.domain(),
                values_x: function.samples_x(),
                values_y: function.samples_y(),
            })
        })
        .collect::<Result<_, _>>()?;
    Ok(WorkspaceDoc { function_list })
}

/// Writes `workspace` to `writer` as an indented document. Nothing is written
/// if any function has a non-finite constant or domain boundary.
pub fn write<W: io::Write>(workspace: &Workspace, writer: W) -> Result<(), EncodeErr> {
    let doc = doc(workspace)?;
    let mut ser = serde_json::Serializer::with_formatter(writer, PrettyFormatter::with_indent(INDENT));
    doc.serialize(&mut ser)?;
    Ok(())
}

pub fn encode(workspace: &Workspace) -> Result<String, EncodeErr> {
    let mut buf = Vec::new();
    write(workspace, &mut buf)?;
    String::from_utf8(buf).map_err(|err| EncodeErr::Json(serde::ser::Error::custom(err)))
}

/// Parses a document and rebuilds its functions. Either every entry decodes
/// or nothing is returned.
pub fn decode(text: &str) -> Result<Workspace, MalformedDocument> {
    let def: WorkspaceDef = serde_json::from_str(text).map_err(|err| MalformedDocument {
        typ: MalformedTyp::Document(err),
        entry: None,
    })?;

    let mut workspace = Workspace::new();
    for (i, value) in def.function_list.into_iter().enumerate() {
        let malformed = |typ: MalformedTyp| MalformedDocument {
            typ,
            entry: Some(i),
        };

        let def: FunctionDef =
            serde_json::from_value(value).map_err(|err| malformed(MalformedTyp::Entry(err)))?;
        if def.typ.kind().is_none() {
            log::warn!(
                "function '{name}' has unknown type '{typ}' and will evaluate to NaN",
                name = def.name,
                typ = def.typ
            );
        }
        if workspace.contains(&def.name) {
            log::warn!(
                "function '{}' is defined more than once, keeping entry {i}",
                def.name
            );
        }

        let function = Function::new(def.typ, def.constants, def.domain)
            .map_err(|err| malformed(MalformedTyp::Constants(err)))?;
        workspace.add(function, def.name);
    }

    log::debug!("decoded workspace with {} function(s)", workspace.len());
    Ok(workspace)
}
