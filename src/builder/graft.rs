//! Branch Grafting - Building a registered branch type as a new owner.
//!
//! 1. resolve the branch type
//! 2. load its document, if it declares one
//! 3. pick the name (explicit, then inline, then document)
//! 4. create and attach the backing component, register the name
//! 5. make the new owner current
//! 6. apply inline data
//! 7. apply the document body (refused if the type is already mid-document)
//! 8. run the `on_built` hook
//! 9. restore the previous owner (guard drop, also on error)
//! 10. raise `<<SubtreeAdded>>` on the parent
//!
//! The same steps run during the initial build and from command handlers
//! long after it.

use std::rc::Rc;

use super::dispatch::{apply_body, node_name};
use super::{BranchContext, Builder};
use crate::document::{body_of, NodePath};
use crate::engine::{BranchType, HookArgs, Owner, OwnerRef};
use crate::error::{Error, Result};
use crate::primitives::ComponentRef;
use crate::state::SUBTREE_ADDED;
use crate::types::{Body, Value};

pub(crate) fn graft(
    builder: &Builder,
    type_name: &str,
    name: Option<&str>,
    parent: Option<&ComponentRef>,
    inline: Option<&Body>,
    path: &NodePath,
) -> Result<OwnerRef> {
    let branch_type = builder
        .branch_type(type_name)
        .ok_or_else(|| Error::definition(path, format!("unknown branch type '{type_name}'")))?;
    if builder.building().contains(type_name) {
        let chain = builder.building().chain().join(" -> ");
        return Err(Error::definition(
            path,
            format!("recursive branch '{type_name}' (inside {chain})"),
        ));
    }

    let file_path = NodePath::root().node(type_name);
    let file_body = load_document(builder, &branch_type, path)?;
    if branch_type.document_path().is_some() && file_body.is_none() && !has_inline_data(inline) {
        return Err(Error::definition(
            path,
            format!("document for '{type_name}' has no '{type_name}' entry and no inline data was given"),
        ));
    }

    let name = match name.filter(|name| !name.is_empty()) {
        Some(name) => Some(name.to_string()),
        None => match inline.map(|body| node_name(body, path)).transpose()?.flatten() {
            Some(name) => Some(name),
            None => file_body
                .as_ref()
                .map(|body| node_name(body, &file_path))
                .transpose()?
                .flatten(),
        },
    };

    let component = builder
        .toolkit()
        .instantiate(branch_type.base(), parent, name.as_deref())
        .ok_or_else(|| {
            Error::definition(
                path,
                format!("branch '{type_name}' has unknown base type '{}'", branch_type.base()),
            )
        })?;
    if let Some(parent) = parent {
        parent.attach(component.clone());
    }
    let owner = Rc::new(Owner::new(type_name, component.clone(), branch_type.create()));
    builder.adopt(owner.clone());
    if let Some(name) = &name {
        builder.name_child(name, &component);
        builder.register_id(name, &component, path)?;
    }
    log::debug!("{path}: graft {type_name} (name: {name:?})");

    {
        let _scope = builder.scope().enter(owner.clone());
        if let Some(inline) = inline {
            apply_body(builder, &component, inline, path)?;
        }
        if let Some(body) = &file_body {
            let _building = builder.building().enter(type_name);
            apply_body(builder, &component, body, &file_path)?;
        }
        let args = HookArgs::collect(file_body.as_ref(), inline, path)?;
        owner
            .branch()
            .on_built(&BranchContext::new(builder, &owner), &args)?;
    }

    if builder.config().notify_parent {
        if let Some(parent) = parent {
            parent.generate_event(SUBTREE_ADDED);
        }
    }
    Ok(owner)
}

/// Body keyed by the branch's type name in its document, if it has one.
fn load_document(builder: &Builder, branch_type: &BranchType, path: &NodePath) -> Result<Option<Body>> {
    let Some(document) = branch_type.document_path() else {
        return Ok(None);
    };
    let location = builder.config().resolve(document);
    log::debug!("{path}: loading {}", location.display());
    let value = builder.loader().load(&location)?;
    let Value::Object(entries) = &value else {
        return Err(Error::definition(
            path,
            format!("document '{}' is not a mapping of type names", location.display()),
        ));
    };
    entries
        .get(branch_type.name())
        .map(|body| body_of(body, &NodePath::root().node(branch_type.name())))
        .transpose()
}

/// Inline data counts when it holds anything besides the name.
fn has_inline_data(inline: Option<&Body>) -> bool {
    inline.is_some_and(|body| body.keys().any(|key| key != "name"))
}
