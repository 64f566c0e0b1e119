policy_builder! {
    /// Immutable Content-Security-Policy produced by [`ContentSecurityPolicyBuilder`],
    /// e.g. `default-src 'self'; object-src 'none';`.
    policy ContentSecurityPolicy;
    builder ContentSecurityPolicyBuilder;
    kind Content;
    helpers {
        add_default_src => "default-src",
        add_child_src => "child-src",
        add_connect_src => "connect-src",
        add_font_src => "font-src",
        add_frame_src => "frame-src",
        add_frame_ancestors => "frame-ancestors",
        add_img_src => "img-src",
        add_manifest_src => "manifest-src",
        add_media_src => "media-src",
        add_object_src => "object-src",
        add_prefetch_src => "prefetch-src",
        add_script_src => "script-src",
        add_script_elem_src => "script-src-elem",
        add_script_attr_src => "script-src-attr",
        add_style_src => "style-src",
        add_style_elem_src => "style-src-elem",
        add_style_attr_src => "style-src-attr",
        add_worker_src => "worker-src",
        /// Usually left without sources: renders as the bare keyword.
        add_upgrade_insecure_requests => "upgrade-insecure-requests",
        add_block_all_mixed_content => "block-all-mixed-content",
    }
}
