//! Shared fixtures: a shopping-list root with grafted items.

#![allow(dead_code)]

use std::rc::Rc;

use spark_tree::{
    method, Application, Branch, BranchContext, BranchType, BuilderConfig, Error, HookArgs,
    MemoryLoader, MemoryToolkit, Method, Result, Value,
};

pub const ROOT: &str = include_str!("../fixtures/root.yaml");
pub const TITLE_FRAME: &str = include_str!("../fixtures/title_frame.yaml");
pub const ITEM: &str = include_str!("../fixtures/item.yaml");
pub const BROKEN: &str = include_str!("../fixtures/broken.yaml");
pub const FORM_YAML: &str = include_str!("../fixtures/form.yaml");
pub const FORM_JSON: &str = include_str!("../fixtures/form.json");

pub fn loader() -> MemoryLoader {
    MemoryLoader::new()
        .with("root.yaml", ROOT)
        .and_then(|loader| loader.with("title_frame.yaml", TITLE_FRAME))
        .and_then(|loader| loader.with("item.yaml", ITEM))
        .and_then(|loader| loader.with("broken.yaml", BROKEN))
        .expect("fixtures parse")
}

pub struct RootBranch;

impl Branch for RootBranch {
    fn method(&self, name: &str) -> Option<Method> {
        match name {
            "toggle" => Some(method(|ctx| {
                let flag = ctx.require_variable("flag")?;
                let current = flag.get_bool().unwrap_or(false);
                flag.set(!current)
            })),
            "add_item" => Some(method(|ctx| {
                let list = ctx
                    .widget("item_list")
                    .ok_or_else(|| Error::command("add_item", "no item_list"))?;
                ctx.add_branch("Item", &list).map(drop)
            })),
            _ => None,
        }
    }
}

pub struct ItemBranch;

impl Branch for ItemBranch {
    fn method(&self, name: &str) -> Option<Method> {
        match name {
            "remove" => Some(method(|ctx| {
                ctx.builder().remove(ctx.component());
                Ok(())
            })),
            _ => None,
        }
    }

    fn on_built(&self, ctx: &BranchContext<'_>, args: &HookArgs) -> Result<()> {
        let label = ctx.require_variable("label")?;
        if let Some(Value::String(text)) = args.kwarg("label").or(args.arg(0)) {
            label.set(text.as_str())?;
        }
        Ok(())
    }
}

pub fn root_type() -> BranchType {
    BranchType::new("Root", "Tk", || RootBranch).document("root.yaml")
}

pub fn branch_types() -> Vec<BranchType> {
    vec![
        BranchType::plain("TitleFrame", "LabelFrame").document("title_frame.yaml"),
        BranchType::new("Item", "Frame", || ItemBranch).document("item.yaml"),
        BranchType::plain("Broken", "Frame").document("broken.yaml"),
    ]
}

pub fn app_with(config: BuilderConfig) -> (Application, Rc<MemoryToolkit>) {
    let toolkit = Rc::new(MemoryToolkit::new());
    let app = spark_tree::build(
        root_type(),
        branch_types(),
        toolkit.clone(),
        Rc::new(loader()),
        config,
    )
    .expect("root builds");
    (app, toolkit)
}

pub fn app() -> (Application, Rc<MemoryToolkit>) {
    app_with(BuilderConfig::default())
}
