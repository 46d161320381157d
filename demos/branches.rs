//! Shopping list demo: a root window with items grafted at runtime.
//!
//! Run with: RUST_LOG=debug cargo run --example branches

use std::path::Path;
use std::rc::Rc;

use spark_tree::{
    method, Branch, BranchContext, BranchType, BuilderConfig, ComponentRef, Error, FileLoader,
    HookArgs, MemoryToolkit, Method, Result, Value, SUBTREE_ADDED,
};

struct Shopping;

impl Branch for Shopping {
    fn method(&self, name: &str) -> Option<Method> {
        match name {
            "toggle" => Some(method(|ctx| {
                let flag = ctx.require_variable("flag")?;
                let show = !flag.get_bool().unwrap_or(false);
                log::info!("show done items: {show}");
                flag.set(show)
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

struct Item;

impl Branch for Item {
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
        if let Some(Value::String(label)) = args.arg(0) {
            ctx.require_variable("label")?.set(label.as_str())?;
        }
        Ok(())
    }
}

fn print_tree(component: &ComponentRef, depth: usize) {
    let name = component.name().map(|n| format!(" ({n})")).unwrap_or_default();
    println!("{}{}{name}", "  ".repeat(depth), component.type_name());
    for child in component.children() {
        print_tree(&child, depth + 1);
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let config = BuilderConfig {
        document_root: Some(Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/layouts")),
        ..Default::default()
    };
    let app = spark_tree::build(
        BranchType::new("Root", "Tk", || Shopping).document("root.yaml"),
        [
            BranchType::plain("TitleFrame", "LabelFrame").document("title_frame.yaml"),
            BranchType::new("Item", "Frame", || Item).document("item.yaml"),
        ],
        Rc::new(MemoryToolkit::new()),
        Rc::new(FileLoader),
        config,
    )?;

    let list = app
        .widget("item_list")
        .ok_or_else(|| Error::command("demo", "item_list missing"))?;
    let _unbind = list.bind(
        SUBTREE_ADDED,
        Rc::new(|event| log::info!("item list changed: {event}")),
    );

    // Click "Add" twice, then "Toggle".
    if let Some(add) = app.widget("add_button") {
        add.activate()?;
        add.activate()?;
    }
    if let Some(toggle) = app.widget("toggle_button") {
        toggle.activate()?;
    }

    print_tree(app.component(), 0);
    println!("flag = {}", app.variable("flag").map(|v| v.get_string()).unwrap_or_default());
    println!("ids  = {:?}", app.builder().widget_ids());
    Ok(())
}
