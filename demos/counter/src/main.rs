use std::rc::Rc;

use lumen_core::{Value, effect, object, reactive};
use lumen_renderer::*;

type Node = VNode<DomNode>;

fn view(state: &Value) -> Node {
    let count = state.get("count");
    let increment = {
        let state = state.clone();
        move |_: &Event| {
            let next = state.get("count").as_f64().unwrap_or(0.0) + 1.0;
            state.set("count", next);
        }
    };
    VNode::element("div").prop("class", "counter").with_children(vec![
        h("span", format!("Count: {count}")),
        VNode::element("button")
            .on("click", increment)
            .with_children("Increment"),
    ])
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let host = Rc::new(MemoryHost::new());
    let renderer = Rc::new(Renderer::new(host.clone()));
    let app = Rc::new(Container::new(DomNode::element("main")));
    let state = reactive(object! { "count" => 0 });

    let _render = effect({
        let renderer = renderer.clone();
        let app = app.clone();
        let state = state.clone();
        move || {
            if let Err(err) = renderer.render(Some(view(&state)), &app) {
                log::error!("render failed: {err}");
            }
        }
    });
    println!("{}", app.node().to_html());

    for _ in 0..3 {
        let button = app
            .node()
            .child(0)
            .and_then(|div| div.child(1))
            .ok_or_else(|| anyhow::anyhow!("button is not mounted"))?;
        host.click(&button);
    }
    println!("{}", app.node().to_html());
    log::info!("{} host operations", host.ops().len());

    let code = lumen_compiler::compile("<div><p>Vue</p><p>Template</p></div>")?;
    println!("{code}");
    Ok(())
}
