pub const CONTAINER: &str = "min-h-screen bg-gray-50 dark:bg-gray-900 w-full px-4 sm:px-6 lg:px-8";
pub const CONTAINER_SM: &str = "max-w-md mx-auto px-4 sm:px-6 py-4 bg-gray-50 dark:bg-gray-900";
pub const CARD: &str = "bg-white dark:bg-gray-800 rounded-lg shadow-lg dark:shadow-[0_4px_12px_-4px_rgba(255,255,255,0.03)] p-6";
pub const CARD_ERROR: &str = "bg-red-50 dark:bg-red-900/50 border border-red-200 dark:border-red-800 rounded-lg p-4 text-red-700 dark:text-red-200";
pub const CARD_SUCCESS: &str = "bg-green-50 dark:bg-green-900/50 border border-green-200 dark:border-green-800 rounded-lg p-4 text-green-700 dark:text-green-200";
pub const CARD_NEUTRAL: &str = "bg-gray-100 dark:bg-gray-800 border border-gray-200 dark:border-gray-700 rounded-lg p-4 text-gray-700 dark:text-gray-200";
pub const BUTTON_PRIMARY: &str = "inline-flex items-center justify-center px-4 py-2 rounded-lg font-medium text-white bg-gradient-to-r from-blue-600 to-blue-700 hover:from-blue-700 hover:to-blue-800 shadow-lg dark:shadow-[0_4px_12px_-4px_rgba(255,255,255,0.03)] hover:shadow-xl dark:hover:shadow-[0_6px_16px_-6px_rgba(255,255,255,0.06)] transition-all duration-300";
pub const BUTTON_DISABLED: &str = "inline-flex items-center justify-center px-4 py-2 rounded-lg font-medium text-white bg-gray-400 dark:bg-gray-600 cursor-not-allowed opacity-70";
pub const TEXT_H2: &str = "text-2xl font-bold text-gray-900 dark:text-white";
pub const TEXT_H3: &str = "text-xl font-bold text-gray-900 dark:text-white";
pub const TEXT_BODY: &str = "text-gray-600 dark:text-gray-300";
pub const TEXT_SMALL: &str = "text-sm text-gray-500 dark:text-gray-400";
pub const TEXT_HINT: &str = "text-xs text-gray-500 dark:text-gray-400 mt-1";

/// Reel geometry lives in plain CSS: the engine measures these boxes, so
/// they must not depend on utility classes loading first.
pub const REEL_CSS: &str = r#"
.reel-frame {
    width: 100%;
}

.reel-viewport {
    position: relative;
    overflow: hidden;
    width: 100%;
    margin: 0 auto;
    height: 132px;
    border-radius: 12px;
    background: rgba(17, 24, 39, 0.85);
}

.reel-track {
    display: flex;
    height: 100%;
    will-change: transform;
}

.reel-cell {
    flex: 0 0 92px;
    margin: 0 4px;
    display: flex;
    flex-direction: column;
    align-items: center;
    justify-content: center;
    border-radius: 8px;
    background: rgba(55, 65, 81, 0.9);
    color: #f9fafb;
    font-size: 12px;
    text-align: center;
}

.reel-cell img {
    width: 56px;
    height: 56px;
    object-fit: contain;
}

.reel-cell-price {
    color: #fcd34d;
}

.reel-pointer {
    position: absolute;
    top: 0;
    bottom: 0;
    left: 50%;
    width: 4px;
    transform: translateX(-50%);
    background: #facc15;
    box-shadow: 0 0 8px rgba(250, 204, 21, 0.8);
    pointer-events: none;
}
"#;
