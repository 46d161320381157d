//! Directive Dispatcher - Applies a node body to a component.
//!
//! Entries run strictly in document order. Reserved keys get a dedicated
//! handler; every other key is either a configurable option of the
//! component or one of its extension methods.
//!
//! | Key | Effect |
//! |-----|--------|
//! | `children` | build each element below the component |
//! | `variable`, `list_variable`, `text_variable` | bind a pool variable |
//! | `app_command` | bind an owner method as `command` |
//! | `app_command_event` | `command` raises `<<value>>` on the owner |
//! | `id` | register in the widget registry |
//! | `pack`, `grid` | one placement call |
//! | `font_size` | `font` with the toolkit's default family |
//! | `minsize` | minimum width/height |
//! | `name`, `post_build_args`, `post_build_kwargs` | consumed elsewhere |

use std::rc::Rc;

use super::placement::{parse_grid, parse_pack};
use super::Builder;
use crate::document::{describe, NodePath};
use crate::error::{Error, Result};
use crate::primitives::{Command, ComponentRef, Setting, ToolkitError};
use crate::state::{virtual_event, VarSpec};
use crate::types::{Body, Font, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    Children,
    Variable(&'static str),
    AppCommand,
    AppCommandEvent,
    Id,
    Pack,
    Grid,
    FontSize,
    MinSize,
    Consumed,
    Fallback,
}

impl Directive {
    fn of(key: &str) -> Self {
        match key {
            "children" => Self::Children,
            "variable" => Self::Variable("variable"),
            "list_variable" => Self::Variable("listvariable"),
            "text_variable" => Self::Variable("textvariable"),
            "app_command" => Self::AppCommand,
            "app_command_event" => Self::AppCommandEvent,
            "id" => Self::Id,
            "pack" => Self::Pack,
            "grid" => Self::Grid,
            "font_size" => Self::FontSize,
            "minsize" => Self::MinSize,
            "name" | "post_build_args" | "post_build_kwargs" => Self::Consumed,
            _ => Self::Fallback,
        }
    }
}

/// Apply every entry of `body` to `component`, in order.
pub(crate) fn apply_body(builder: &Builder, component: &ComponentRef, body: &Body, path: &NodePath) -> Result<()> {
    for (key, value) in body {
        let directive = Directive::of(key);
        log::trace!("{path}: {key} ({directive:?})");
        let at = path.key(key);
        match directive {
            Directive::Children => build_children(builder, component, value, path)?,
            Directive::Variable(option) => bind_variable(builder, component, option, value, &at)?,
            Directive::AppCommand => bind_method(builder, component, value, &at)?,
            Directive::AppCommandEvent => bind_event(builder, component, value, &at)?,
            Directive::Id => {
                let id = id_string(value, &at)?;
                builder.register_id(&id, component, &at)?;
            }
            Directive::Pack => place(component, parse_pack(value, &at)?, key, &at)?,
            Directive::Grid => place(component, parse_grid(value, &at)?, key, &at)?,
            Directive::FontSize => set_font_size(component, value, &at)?,
            Directive::MinSize => set_min_size(component, value, &at)?,
            Directive::Consumed => {}
            Directive::Fallback => configure_or_invoke(component, key, value, &at)?,
        }
    }
    Ok(())
}

/// The `name` attribute of a body, if any. Empty names count as absent.
pub(crate) fn node_name(body: &Body, path: &NodePath) -> Result<Option<String>> {
    match body.get("name") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(name)) if name.is_empty() => Ok(None),
        Some(Value::String(name)) => Ok(Some(name.clone())),
        Some(other) => Err(Error::type_error(
            path.key("name"),
            format!("name must be a string, found {}", describe(other)),
        )),
    }
}

fn build_children(builder: &Builder, component: &ComponentRef, value: &Value, path: &NodePath) -> Result<()> {
    match value {
        Value::Null => Ok(()),
        Value::Array(children) => {
            for (index, child) in children.iter().enumerate() {
                builder.build_node(child, Some(component), &path.child(index))?;
            }
            Ok(())
        }
        other => Err(Error::type_error(
            path.key("children"),
            format!("children must be a sequence, found {}", describe(other)),
        )),
    }
}

fn bind_variable(builder: &Builder, component: &ComponentRef, option: &str, value: &Value, path: &NodePath) -> Result<()> {
    let spec = VarSpec::from_value(value, path)?;
    let owner = builder.require_owner(path)?;
    let cell = owner.variables().resolve(&spec, path)?;
    component
        .configure(option, Setting::Variable(cell))
        .map_err(|e| toolkit_error(e, component, option, path))
}

fn bind_method(builder: &Builder, component: &ComponentRef, value: &Value, path: &NodePath) -> Result<()> {
    let Value::String(name) = value else {
        return Err(Error::type_error(
            path,
            format!("app_command must name a method, found {}", describe(value)),
        ));
    };
    let owner = builder.require_owner(path)?;
    let method = owner.resolve_method(name).ok_or_else(|| Error::Binding {
        path: path.to_string(),
        owner: owner.type_name().to_string(),
        method: name.clone(),
    })?;

    let weak_builder = builder.downgrade();
    let weak_owner = Rc::downgrade(&owner);
    let command_name = name.clone();
    let command: Command = Rc::new(move || {
        let (Some(builder), Some(owner)) = (weak_builder.upgrade(), weak_owner.upgrade()) else {
            return Err(Error::command(command_name.as_str(), "owner no longer exists"));
        };
        builder.with_owner(&owner, |ctx| method(ctx))
    });
    component
        .configure("command", Setting::Command(command))
        .map_err(|e| toolkit_error(e, component, "command", path))
}

fn bind_event(builder: &Builder, component: &ComponentRef, value: &Value, path: &NodePath) -> Result<()> {
    let Value::String(name) = value else {
        return Err(Error::type_error(
            path,
            format!("app_command_event must name an event, found {}", describe(value)),
        ));
    };
    let owner = builder.require_owner(path)?;
    let target = Rc::downgrade(owner.component());
    let event = virtual_event(name);
    let command: Command = Rc::new(move || {
        match target.upgrade() {
            Some(target) => {
                log::trace!("raise {event} on {}", target.type_name());
                target.generate_event(&event);
            }
            None => log::debug!("{event} dropped: owner component is gone"),
        }
        Ok(())
    });
    component
        .configure("command", Setting::Command(command))
        .map_err(|e| toolkit_error(e, component, "command", path))
}

fn id_string(value: &Value, path: &NodePath) -> Result<String> {
    match value {
        Value::String(id) if !id.is_empty() => Ok(id.clone()),
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
        other => Err(Error::type_error(
            path,
            format!("id must be a non-empty string or an integer, found {}", describe(other)),
        )),
    }
}

fn place(component: &ComponentRef, placement: crate::types::Placement, key: &str, path: &NodePath) -> Result<()> {
    component
        .place(placement)
        .map_err(|e| toolkit_error(e, component, key, path))
}

fn set_font_size(component: &ComponentRef, value: &Value, path: &NodePath) -> Result<()> {
    let size = match value {
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
    .ok_or_else(|| {
        Error::type_error(path, format!("font_size must be an integer, found {}", describe(value)))
    })?;
    component
        .configure("font", Setting::Font(Font::sized(size)))
        .map_err(|e| toolkit_error(e, component, "font", path))
}

fn set_min_size(component: &ComponentRef, value: &Value, path: &NodePath) -> Result<()> {
    let size = match value {
        Value::Array(items) => match items.as_slice() {
            [width, height] => width.as_f64().zip(height.as_f64()),
            _ => None,
        },
        _ => None,
    };
    let Some((width, height)) = size else {
        return Err(Error::type_error(
            path,
            format!("minsize expects [width, height], found {}", describe(value)),
        ));
    };
    component
        .set_min_size(width, height)
        .map_err(|e| toolkit_error(e, component, "minsize", path))
}

fn configure_or_invoke(component: &ComponentRef, key: &str, value: &Value, path: &NodePath) -> Result<()> {
    if component.is_configurable(key) {
        return component
            .configure(key, Setting::Value(value.clone()))
            .map_err(|e| toolkit_error(e, component, key, path));
    }

    let Some(arity) = component.method_arity(key) else {
        return Err(Error::Attribute {
            path: path.to_string(),
            component: component.type_name().to_string(),
            key: key.to_string(),
        });
    };
    let args = match value {
        _ if arity == 0 => Vec::new(),
        Value::Array(items) if arity > 1 => items.clone(),
        _ => vec![value.clone()],
    };
    component
        .invoke(key, &args)
        .map(drop)
        .map_err(|e| toolkit_error(e, component, key, path))
}

fn toolkit_error(err: ToolkitError, component: &ComponentRef, key: &str, path: &NodePath) -> Error {
    match err {
        ToolkitError::UnknownOption(_) | ToolkitError::UnknownMethod(_) => Error::Attribute {
            path: path.to_string(),
            component: component.type_name().to_string(),
            key: key.to_string(),
        },
        other => Error::type_error(path, other.to_string()),
    }
}
