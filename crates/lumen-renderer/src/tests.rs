#[cfg(test)]
mod tests {
    use crate::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;
    use web_time::Instant;

    type Node = VNode<DomNode>;

    fn setup() -> (Rc<MemoryHost>, Renderer<Rc<MemoryHost>>, Container<DomNode>) {
        let host = Rc::new(MemoryHost::new());
        let renderer = Renderer::new(host.clone());
        (host, renderer, Container::new(DomNode::element("div")))
    }

    fn is_create(op: &Op) -> bool {
        matches!(
            op,
            Op::CreateElement(_) | Op::CreateText(_) | Op::CreateComment(_)
        )
    }

    #[test]
    fn test_mount_element_tree() {
        let (host, renderer, app) = setup();
        let tree: Node = VNode::element("ul")
            .prop("id", "list")
            .prop("data-kind", "plain")
            .with_children(vec![h("li", "one"), h("li", "two")]);

        renderer.render(Some(tree), &app).unwrap();

        assert_eq!(
            app.node().to_html(),
            "<div><ul data-kind=\"plain\"><li>one</li><li>two</li></ul></div>"
        );
        let ul = app.node().child(0).unwrap();
        assert_eq!(ul.property("id"), Some(DomProp::Str("list".into())));
        assert_eq!(host.count_ops(|op| matches!(op, Op::CreateElement(_))), 3);
        assert!(app.has_vnode());
    }

    #[test]
    fn test_attribute_change_patches_in_place() {
        let (host, renderer, app) = setup();
        renderer
            .render(Some(VNode::element("button").prop("disabled", false)), &app)
            .unwrap();
        let before = app.with_vnode(|v| v.and_then(VNode::el)).unwrap();
        assert_eq!(before.property("disabled"), Some(DomProp::Bool(false)));
        host.clear_ops();

        renderer
            .render(Some(VNode::element("button").prop("disabled", true)), &app)
            .unwrap();

        assert_eq!(host.ops(), vec![Op::PatchProp("disabled".into())]);
        assert_eq!(host.count_ops(is_create), 0);
        let after = app.with_vnode(|v| v.and_then(VNode::el)).unwrap();
        assert!(before.ptr_eq(&after));
        assert_eq!(after.property("disabled"), Some(DomProp::Bool(true)));
    }

    #[test]
    fn test_unchanged_props_issue_no_ops() {
        let (host, renderer, app) = setup();
        let tree = || -> Node { VNode::element("a").prop("href", "/home").prop("class", "nav") };
        renderer.render(Some(tree()), &app).unwrap();
        host.clear_ops();

        renderer.render(Some(tree()), &app).unwrap();
        assert!(host.ops().is_empty());
    }

    #[test]
    fn test_removed_prop_is_cleared() {
        let (host, renderer, app) = setup();
        renderer
            .render(Some(VNode::element("a").prop("href", "/x").prop("class", "big")), &app)
            .unwrap();
        let a = app.node().child(0).unwrap();
        assert_eq!(a.attribute("href").as_deref(), Some("/x"));
        assert_eq!(a.class_name(), "big");
        host.clear_ops();

        renderer.render(Some(VNode::element("a")), &app).unwrap();
        assert_eq!(host.count_ops(|op| matches!(op, Op::PatchProp(_))), 2);
        assert_eq!(a.attribute("href"), None);
        assert_eq!(a.class_name(), "");
    }

    #[test]
    fn test_type_change_remounts() {
        let (host, renderer, app) = setup();
        renderer.render(Some(h("div", "x")), &app).unwrap();
        host.clear_ops();

        renderer.render(Some(h("span", "x")), &app).unwrap();
        assert_eq!(app.node().to_html(), "<div><span>x</span></div>");
        assert_eq!(host.count_ops(|op| *op == Op::Remove), 1);
        assert_eq!(host.count_ops(|op| matches!(op, Op::CreateElement(_))), 1);
    }

    #[test]
    fn test_fragment_unmount_removes_each_child() {
        let (host, renderer, app) = setup();
        let tree: Node = VNode::fragment(vec![
            VNode::text("a"),
            VNode::text("b"),
            VNode::text("c"),
        ]);
        renderer.render(Some(tree), &app).unwrap();
        assert_eq!(app.node().to_html(), "<div>abc</div>");
        host.clear_ops();

        renderer.render(None, &app).unwrap();
        assert_eq!(host.ops(), vec![Op::Remove, Op::Remove, Op::Remove]);
        assert_eq!(app.node().child_count(), 0);
        assert!(!app.has_vnode());
    }

    #[test]
    fn test_fragment_children_are_rediffed_into_container() {
        let (_host, renderer, app) = setup();
        renderer
            .render(Some(VNode::fragment(vec![h("p", "1"), h("p", "2")])), &app)
            .unwrap();
        renderer
            .render(Some(VNode::fragment(vec![h("b", "3")])), &app)
            .unwrap();
        assert_eq!(app.node().to_html(), "<div><b>3</b></div>");
    }

    #[test]
    fn test_text_node_reused() {
        let (host, renderer, app) = setup();
        renderer.render(Some(VNode::text("a")), &app).unwrap();
        let first = app.node().child(0).unwrap();
        host.clear_ops();

        renderer.render(Some(VNode::text("a")), &app).unwrap();
        assert!(host.ops().is_empty());

        renderer.render(Some(VNode::text("b")), &app).unwrap();
        assert_eq!(host.ops(), vec![Op::SetText("b".into())]);
        assert!(first.ptr_eq(&app.node().child(0).unwrap()));
        assert_eq!(app.node().text_content(), "b");
    }

    #[test]
    fn test_comment_node_reused() {
        let (host, renderer, app) = setup();
        renderer.render(Some(VNode::comment("x")), &app).unwrap();
        host.clear_ops();
        renderer.render(Some(VNode::comment("y")), &app).unwrap();
        assert_eq!(host.ops(), vec![Op::SetComment("y".into())]);
        assert_eq!(app.node().to_html(), "<div><!--y--></div>");
    }

    #[test]
    fn test_children_diff_transitions() {
        let (_host, renderer, app) = setup();

        renderer.render(Some(h("div", "text")), &app).unwrap();
        assert_eq!(app.node().to_html(), "<div><div>text</div></div>");

        renderer
            .render(Some(h("div", vec![h("i", "a"), h("i", "b")])), &app)
            .unwrap();
        assert_eq!(app.node().to_html(), "<div><div><i>a</i><i>b</i></div></div>");

        renderer.render(Some(h("div", vec![h("i", "c")])), &app).unwrap();
        assert_eq!(app.node().to_html(), "<div><div><i>c</i></div></div>");

        renderer.render(Some(h("div", "again")), &app).unwrap();
        assert_eq!(app.node().to_html(), "<div><div>again</div></div>");

        renderer.render(Some(VNode::element("div")), &app).unwrap();
        assert_eq!(app.node().to_html(), "<div><div></div></div>");

        renderer.render(Some(h("div", vec![h("i", "d")])), &app).unwrap();
        renderer.render(Some(VNode::element("div")), &app).unwrap();
        assert_eq!(app.node().to_html(), "<div><div></div></div>");
    }

    #[test]
    fn test_sequence_children_are_rebuilt() {
        let (host, renderer, app) = setup();
        renderer
            .render(Some(h("ul", vec![h("li", "1"), h("li", "2")])), &app)
            .unwrap();
        host.clear_ops();

        renderer
            .render(Some(h("ul", vec![h("li", "1"), h("li", "2")])), &app)
            .unwrap();
        assert_eq!(host.count_ops(|op| *op == Op::Remove), 2);
        assert_eq!(host.count_ops(|op| matches!(op, Op::CreateElement(_))), 2);
    }

    #[test]
    fn test_render_none_on_empty_container() {
        let (host, renderer, app) = setup();
        renderer.render(None, &app).unwrap();
        assert!(host.ops().is_empty());
        assert!(!app.has_vnode());
    }

    #[test]
    fn test_component_is_rejected() {
        let (_host, renderer, app) = setup();
        renderer.render(Some(h("p", "kept")), &app).unwrap();

        let descriptor = Rc::new(ComponentDescriptor {
            name: "Counter".into(),
        });
        let err = renderer
            .render(Some(VNode::component(descriptor)), &app)
            .unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedNodeType(_)));
        assert!(app.with_vnode(|v| v.is_some_and(|v| *v.kind() == VNodeType::Element("p".into()))));
        assert_eq!(app.node().to_html(), "<div><p>kept</p></div>");
    }

    #[test]
    fn test_cloned_vnode_is_not_mounted() {
        let (_host, renderer, app) = setup();
        renderer.render(Some(h("p", "x")), &app).unwrap();
        let copy = app.with_vnode(|v| v.cloned()).unwrap();
        assert!(copy.el().is_none());
    }

    #[test]
    fn test_prop_setting_rules() {
        let (_host, renderer, app) = setup();
        let tree: Node = VNode::element("input")
            .prop("disabled", "")
            .prop("form", "signup")
            .prop("value", "hi")
            .prop("class", "wide")
            .prop("aria-label", "name");
        renderer.render(Some(tree), &app).unwrap();

        let input = app.node().child(0).unwrap();
        // empty string on a boolean property means `true`
        assert_eq!(input.property("disabled"), Some(DomProp::Bool(true)));
        assert_eq!(input.attribute("form").as_deref(), Some("signup"));
        assert_eq!(input.property("form"), None);
        assert_eq!(input.property("value"), Some(DomProp::Str("hi".into())));
        assert_eq!(input.class_name(), "wide");
        assert_eq!(input.attribute("aria-label").as_deref(), Some("name"));
    }

    #[test]
    fn test_listener_bind_update_unbind() {
        let (host, renderer, app) = setup();
        let hits = Rc::new(Cell::new(0));

        let first = {
            let hits = hits.clone();
            move |_: &Event| hits.set(hits.get() + 1)
        };
        renderer
            .render(Some(VNode::element("button").on("click", first)), &app)
            .unwrap();
        let button = app.node().child(0).unwrap();
        assert!(button.has_listener("click"));
        assert_eq!(host.click(&button), 1);
        assert_eq!(hits.get(), 1);

        let second = {
            let hits = hits.clone();
            move |_: &Event| hits.set(hits.get() + 10)
        };
        renderer
            .render(Some(VNode::element("button").on("click", second)), &app)
            .unwrap();
        host.click(&button);
        assert_eq!(hits.get(), 11);

        renderer.render(Some(VNode::element("button")), &app).unwrap();
        assert!(!button.has_listener("click"));
        assert_eq!(host.click(&button), 0);
    }

    #[test]
    fn test_stale_event_is_not_delivered() {
        let start = Instant::now();
        let clock = TestClock::new(start);
        let host = Rc::new(MemoryHost::with_clock(Box::new(clock.clone())));
        let renderer = Renderer::new(host.clone());
        let app = Container::new(DomNode::element("div"));

        let hits = Rc::new(Cell::new(0));
        clock.advance(Duration::from_millis(10));
        renderer
            .render(
                Some(VNode::element("p").on("click", {
                    let hits = hits.clone();
                    move |_| hits.set(hits.get() + 1)
                })),
                &app,
            )
            .unwrap();
        let p = app.node().child(0).unwrap();

        let early = Event::new("click", start);
        assert_eq!(host.dispatch(&p, &early), 0);
        assert_eq!(hits.get(), 0);

        let late = Event::new("click", start + Duration::from_millis(20));
        assert_eq!(host.dispatch(&p, &late), 1);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_events_bubble_and_stop() {
        let (host, renderer, app) = setup();
        let order = Rc::new(std::cell::RefCell::new(Vec::new()));

        let tree: Node = VNode::element("section")
            .on("click", {
                let order = order.clone();
                move |_| order.borrow_mut().push("section")
            })
            .with_children(vec![VNode::element("button").on("click", {
                let order = order.clone();
                move |_| order.borrow_mut().push("button")
            })]);
        renderer.render(Some(tree), &app).unwrap();

        let button = app.node().child(0).and_then(|s| s.child(0)).unwrap();
        host.click(&button);
        assert_eq!(*order.borrow(), vec!["button", "section"]);

        let stopper: Node = VNode::element("section")
            .on("click", {
                let order = order.clone();
                move |_| order.borrow_mut().push("section")
            })
            .with_children(vec![VNode::element("button").on("click", |e| e.stop_propagation())]);
        renderer.render(Some(stopper), &app).unwrap();
        order.borrow_mut().clear();

        let button = app.node().child(0).and_then(|s| s.child(0)).unwrap();
        host.click(&button);
        assert!(order.borrow().is_empty());
    }

    #[test]
    fn test_nested_component_rejected_before_any_host_op() {
        let (host, renderer, app) = setup();
        renderer
            .render(Some(h("ul", vec![h("li", "old")])), &app)
            .unwrap();
        host.clear_ops();

        let descriptor = Rc::new(ComponentDescriptor { name: "C".into() });
        let err = renderer
            .render(
                Some(h("ul", vec![h("li", "partial"), VNode::component(descriptor)])),
                &app,
            )
            .unwrap_err();
        assert_eq!(err, RenderError::UnsupportedNodeType("component `C`".into()));
        assert!(host.ops().is_empty());
        assert_eq!(app.node().to_html(), "<div><ul><li>old</li></ul></div>");

        renderer
            .render(Some(h("ul", vec![h("li", "next")])), &app)
            .unwrap();
        assert_eq!(app.node().to_html(), "<div><ul><li>next</li></ul></div>");
    }

    #[test]
    fn test_nested_fragment_children_removed_on_rebuild() {
        let (host, renderer, app) = setup();
        let tree: Node = h(
            "div",
            vec![
                h("b", "head"),
                VNode::fragment(vec![h("i", "1"), VNode::text("2"), VNode::comment("3")]),
            ],
        );
        renderer.render(Some(tree), &app).unwrap();
        assert_eq!(
            app.node().to_html(),
            "<div><div><b>head</b><i>1</i>2<!--3--></div></div>"
        );
        host.clear_ops();

        renderer
            .render(Some(h("div", vec![h("b", "tail")])), &app)
            .unwrap();
        assert_eq!(app.node().to_html(), "<div><div><b>tail</b></div></div>");
        // b plus the fragment's three children; nothing for the fragment itself
        assert_eq!(host.count_ops(|op| *op == Op::Remove), 4);
    }

    #[test]
    fn test_shape_summarizes_kind_and_children() {
        let el: Node = h("ul", vec![h("li", "x")]);
        assert_eq!(el.shape(), ShapeFlags::ELEMENT | ShapeFlags::ARRAY_CHILDREN);
        let text: Node = VNode::text("x");
        assert_eq!(text.shape(), ShapeFlags::TEXT | ShapeFlags::TEXT_CHILDREN);
        let bare: Node = VNode::element("br");
        assert_eq!(bare.shape(), ShapeFlags::ELEMENT);
        let frag: Node = VNode::fragment(vec![]);
        assert!(frag.shape().contains(ShapeFlags::FRAGMENT));
    }

    #[test]
    fn test_event_in_binding_tick_is_delivered() {
        let clock = TestClock::new(Instant::now());
        let host = Rc::new(MemoryHost::with_clock(Box::new(clock.clone())));
        let renderer = Renderer::new(host.clone());
        let app = Container::new(DomNode::element("div"));
        let hits = Rc::new(Cell::new(0));
        let tree: Node = VNode::element("button").on("click", {
            let hits = hits.clone();
            move |_| hits.set(hits.get() + 1)
        });
        renderer.render(Some(tree), &app).unwrap();
        let button = app.node().child(0).unwrap();

        // same instant as the binding
        assert_eq!(host.dispatch(&button, &Event::new("click", clock.now())), 1);
        clock.advance(Duration::from_millis(5));
        let early = Event::new("click", clock.now() - Duration::from_millis(10));
        assert_eq!(host.dispatch(&button, &early), 0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_large_numbers_serialize_exactly() {
        assert_eq!(PropValue::from(7).to_string(), "7");
        assert_eq!(PropValue::from(1e20).to_string(), "100000000000000000000");
        assert_eq!(PropValue::from(0.25).to_string(), "0.25");

        let (_host, renderer, app) = setup();
        renderer
            .render(Some(VNode::element("meter").prop("data-max", 1e20)), &app)
            .unwrap();
        assert_eq!(
            app.node().child(0).unwrap().attribute("data-max").as_deref(),
            Some("100000000000000000000")
        );
    }
}


#[cfg(test)]
mod reactive_tests {
    use crate::*;
    use lumen_core::{create_ref, effect, object, reactive};
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;
    use web_time::Instant;

    #[test]
    fn test_effect_rerenders_on_write() {
        let host = Rc::new(MemoryHost::new());
        let renderer = Rc::new(Renderer::new(host.clone()));
        let app = Rc::new(Container::new(DomNode::element("div")));
        let state = reactive(object! { "count" => 0 });

        effect({
            let renderer = renderer.clone();
            let app = app.clone();
            let state = state.clone();
            move || {
                let tree = h("span", state.get("count").to_string());
                renderer.render(Some(tree), &app).unwrap();
            }
        });
        assert_eq!(app.node().to_html(), "<div><span>0</span></div>");
        host.clear_ops();

        state.set("count", 1);
        assert_eq!(app.node().to_html(), "<div><span>1</span></div>");
        assert_eq!(host.ops(), vec![Op::SetElementText("1".into())]);

        host.clear_ops();
        state.set("count", 1);
        assert!(host.ops().is_empty());
    }

    #[test]
    fn test_listener_bound_during_dispatch_ignores_that_event() {
        let clock = TestClock::with_step(Instant::now(), Duration::from_millis(1));
        let host = Rc::new(MemoryHost::with_clock(Box::new(clock)));
        let renderer = Rc::new(Renderer::new(host.clone()));
        let app = Rc::new(Container::new(DomNode::element("main")));

        let expanded = create_ref(false);
        let parent_hits = Rc::new(Cell::new(0));

        effect({
            let renderer = renderer.clone();
            let app = app.clone();
            let expanded = expanded.clone();
            let parent_hits = parent_hits.clone();
            move || {
                let mut outer = VNode::element("div");
                if expanded.get().truthy() {
                    let parent_hits = parent_hits.clone();
                    outer = outer.on("click", move |_| parent_hits.set(parent_hits.get() + 1));
                }
                let inner = VNode::element("p")
                    .on("click", {
                        let expanded = expanded.clone();
                        move |_| {
                            expanded.set(true);
                        }
                    })
                    .with_children("text");
                renderer
                    .render(Some(outer.with_children(vec![inner])), &app)
                    .unwrap();
            }
        });

        let p = app.node().child(0).and_then(|d| d.child(0)).unwrap();
        host.click(&p);
        assert!(expanded.peek().truthy());
        assert!(app.node().child(0).unwrap().has_listener("click"));
        // the outer listener was bound while this click was bubbling
        assert_eq!(parent_hits.get(), 0);

        let p = app.node().child(0).and_then(|d| d.child(0)).unwrap();
        host.click(&p);
        assert_eq!(parent_hits.get(), 1);
    }
}
