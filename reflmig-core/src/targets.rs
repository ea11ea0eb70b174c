//! Built-in migration set: the headers that still used `DECLARE_CLASS`
//! when the reflection generator landed, and the headers that define the
//! legacy macros themselves.

/// Headers to migrate, relative to the project root, in processing order.
pub const DEFAULT_TARGETS: &[&str] = &[
    "Source/Slate/Windows/PropertyWindow.h",
    "Source/Runtime/Engine/GameFramework/Level.h",
    "Source/Runtime/Engine/GameFramework/World.h",
    "Source/Slate/Windows/UIWindow.h",
    "Source/Slate/Windows/SceneWindow.h",
    "Source/Slate/Windows/ExperimentalFeatureWindow.h",
    "Source/Slate/Windows/ContentBrowserWindow.h",
    "Source/Slate/Windows/ControlPanelWindow.h",
    "Source/Slate/Windows/ConsoleWindow.h",
    "Source/Slate/Widgets/Widget.h",
    "Source/Slate/Widgets/SceneManagerWidget.h",
    "Source/Slate/Widgets/TargetActorTransformWidget.h",
    "Source/Slate/Widgets/MainToolbarWidget.h",
    "Source/Slate/Widgets/InputInformationWidget.h",
    "Source/Slate/Widgets/CurveEditorWidget.h",
    "Source/Slate/Widgets/ConsoleWidget.h",
    "Source/Slate/UIManager.h",
    "Source/Slate/SlateManager.h",
    "Source/Slate/ImGui/ImGuiHelper.h",
    "Source/Slate/GlobalConsole.h",
    "Source/Slate/Factory/UIWindowFactory.h",
    "Source/Runtime/Renderer/Shader.h",
    "Source/Runtime/Renderer/RenderManager.h",
    "Source/Runtime/Renderer/QuadManager.h",
    "Source/Runtime/Renderer/Material.h",
    "Source/Runtime/RHI/PipelineStateManager.h",
    "Source/Runtime/InputCore/InputManager.h",
    "Source/Runtime/Engine/Viewer/EditorAssetPreviewContext.h",
    "Source/Runtime/Engine/Spatial/WorldPartitionManager.h",
    "Source/Runtime/Engine/GameFramework/Camera/CameraModifierBase.h",
    "Source/Runtime/Engine/GameFramework/Camera/CamMod_Vignette.h",
    "Source/Runtime/Engine/GameFramework/Camera/CamMod_Shake.h",
    "Source/Runtime/Engine/GameFramework/Camera/CamMod_Fade.h",
    "Source/Runtime/Engine/GameFramework/Camera/CamMod_Gamma.h",
    "Source/Runtime/Engine/GameFramework/Camera/CamMod_LetterBox.h",
    "Source/Runtime/Engine/Components/LineComponent.h",
    "Source/Runtime/Engine/Components/BoneAnchorComponent.h",
    "Source/Runtime/Engine/Collision/CollisionManager.h",
    "Source/Runtime/Engine/Audio/Sound.h",
    "Source/Runtime/AssetManagement/Texture.h",
    "Source/Runtime/AssetManagement/StaticMesh.h",
    "Source/Runtime/AssetManagement/ResourceManager.h",
    "Source/Runtime/AssetManagement/SkeletalMesh.h",
    "Source/Runtime/AssetManagement/Quad.h",
    "Source/Runtime/AssetManagement/ResourceBase.h",
    "Source/Runtime/AssetManagement/MeshLoader.h",
    "Source/Runtime/AssetManagement/Line.h",
    "Source/Runtime/AssetManagement/LineDynamicMesh.h",
    "Source/Runtime/AssetManagement/DynamicMesh.h",
    "Source/Editor/SelectionManager.h",
    "Source/Editor/Grid/GridActor.h",
    "Source/Editor/Gizmo/GizmoRotateComponent.h",
    "Source/Editor/Gizmo/GizmoScaleComponent.h",
    "Source/Editor/Gizmo/GizmoArrowComponent.h",
    "Source/Editor/Gizmo/GizmoActor.h",
    "Source/Editor/FBXLoader.h",
    "Source/Editor/Clipboard/ClipboardManager.h",
];

/// Headers that define the legacy macros and must never be rewritten.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "Source/Runtime/Core/Object/Object.h",
    "Source/Runtime/Core/Object/ObjectMacros.h",
];

/// Owned copy of [`DEFAULT_TARGETS`].
pub fn default_targets() -> Vec<String> {
    DEFAULT_TARGETS.iter().map(|s| s.to_string()).collect()
}

/// Owned copy of [`DEFAULT_EXCLUDES`].
pub fn default_excludes() -> Vec<String> {
    DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect()
}

/// Compare two root-relative paths, ignoring separator style.
pub fn same_relative_path(a: &str, b: &str) -> bool {
    let norm = |s: &str| s.replace('\\', "/").trim_start_matches("./").to_string();
    norm(a) == norm(b)
}
