policy_builder! {
    /// Immutable Permissions-Policy produced by [`PermissionPolicyBuilder`],
    /// e.g. `camera=(), sync-xhr=(self)`.
    policy PermissionPolicy;
    builder PermissionPolicyBuilder;
    kind Permission;
    helpers {
        add_accelerometer => "accelerometer",
        add_ambient_light_sensor => "ambient-light-sensor",
        add_autoplay => "autoplay",
        add_battery => "battery",
        add_camera => "camera",
        add_display_capture => "display-capture",
        add_document_domain => "document-domain",
        add_encrypted_media => "encrypted-media",
        add_execution_while_not_rendered => "execution-while-not-rendered",
        add_execution_while_out_of_viewport => "execution-while-out-of-viewport",
        add_fullscreen => "fullscreen",
        add_geolocation => "geolocation",
        add_gyroscope => "gyroscope",
        add_layout_animations => "layout-animations",
        add_legacy_image_formats => "legacy-image-formats",
        add_magnetometer => "magnetometer",
        add_microphone => "microphone",
        add_midi => "midi",
        add_navigation_override => "navigation-override",
        add_oversized_images => "oversized-images",
        add_payment => "payment",
        add_picture_in_picture => "picture-in-picture",
        add_publickey_credentials_get => "publickey-credentials-get",
        add_sync_xhr => "sync-xhr",
        add_usb => "usb",
        add_vr => "vr",
        add_wake_lock => "wake-lock",
        /// Current name of the `wake-lock` feature.
        add_screen_wake_lock => "screen-wake-lock",
        add_web_share => "web-share",
        add_xr_spatial_tracking => "xr-spatial-tracking",
    }
}
